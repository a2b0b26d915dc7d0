//! Per-page sidebar pipeline.
//!
//! [`Sidebar`] holds the immutable configuration for a site and runs one
//! page load at a time:
//!
//! ```text
//! location ─► current_page ─► discover (async) ─► derive ─► render ─► inject
//! ```
//!
//! Rendering starts only once discovery has produced its result, whether from
//! the manifest or from the self-detection fallback.

use crate::discovery::{DiscoveredEntry, DiscoveryConfig, discover};
use crate::inject::{Anchor, Injection, inject};
use crate::interaction::ViewState;
use crate::manifest::{ManifestLocator, ManifestSource};
use crate::nav::{NavError, NavTree};
use crate::page::{DEFAULT_PAGE, current_page};
use crate::render::render;
use crate::state::{RenderState, derive};

/// Default class marking the main-content element.
pub const DEFAULT_ANCHOR_CLASS: &str = "main-content";

/// Site-wide sidebar settings, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarConfig {
    /// Declarative navigation tree.
    pub tree: NavTree,
    /// Discovery settings.
    pub discovery: DiscoveryConfig,
    /// Page used when a location names a directory.
    pub default_page: String,
    /// Class of the element the sidebar is inserted before.
    pub anchor_class: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            tree: NavTree::default(),
            discovery: DiscoveryConfig::default(),
            default_page: DEFAULT_PAGE.to_owned(),
            anchor_class: DEFAULT_ANCHOR_CLASS.to_owned(),
        }
    }
}

/// Error building a [`Sidebar`].
#[derive(Debug, thiserror::Error)]
pub enum SidebarError {
    /// Navigation tree is invalid.
    #[error(transparent)]
    Navigation(#[from] NavError),
    /// Anchor class cannot be matched.
    #[error("Invalid main-content class '{class}': {source}")]
    Anchor {
        /// Configured class.
        class: String,
        /// Regex build error.
        source: regex::Error,
    },
}

/// Result of resolving, discovering and deriving state for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    /// Resolved current page identifier.
    pub current_page: String,
    /// Unlisted pages found for this load.
    pub discovered: Vec<DiscoveredEntry>,
    /// Derived active/expanded state.
    pub state: RenderState,
}

/// Sidebar engine for one site.
#[derive(Debug)]
pub struct Sidebar<S = ManifestLocator> {
    config: SidebarConfig,
    anchor: Anchor,
    manifest: Option<S>,
}

impl Sidebar {
    /// Validate configuration and create a sidebar without a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`SidebarError::Navigation`] for duplicate hrefs or other
    /// tree errors.
    pub fn new(config: SidebarConfig) -> Result<Self, SidebarError> {
        config.tree.validate()?;
        let anchor = Anchor::new(&config.anchor_class).map_err(|source| SidebarError::Anchor {
            class: config.anchor_class.clone(),
            source,
        })?;
        Ok(Self {
            config,
            anchor,
            manifest: None,
        })
    }
}

impl<S: ManifestSource> Sidebar<S> {
    /// Use `source` for discovery.
    #[must_use]
    pub fn with_manifest<T: ManifestSource>(self, source: T) -> Sidebar<T> {
        Sidebar {
            config: self.config,
            anchor: self.anchor,
            manifest: Some(source),
        }
    }

    /// Site configuration.
    #[must_use]
    pub fn config(&self) -> &SidebarConfig {
        &self.config
    }

    /// Resolve the page at `location`, discover unlisted pages and derive
    /// state.
    pub async fn load(&self, location: &str) -> PageLoad {
        let current_page = current_page(location, &self.config.default_page);
        let discovered = discover(
            &self.config.tree,
            &self.config.discovery,
            &current_page,
            self.manifest.as_ref(),
        )
        .await;
        let state = derive(&self.config.tree, &discovered, &current_page);

        tracing::debug!(
            page = %current_page,
            discovered = discovered.len(),
            "Derived sidebar state"
        );

        PageLoad {
            current_page,
            discovered,
            state,
        }
    }

    /// Sidebar markup for a completed page load.
    #[must_use]
    pub fn render(&self, load: &PageLoad) -> String {
        render(
            &self.config.tree,
            &load.discovered,
            &load.state,
            &self.config.discovery,
        )
    }

    /// Initial toggle state for a completed page load.
    #[must_use]
    pub fn view_state(&self, load: &PageLoad) -> ViewState {
        ViewState::from_render_state(&self.config.tree, &load.state)
    }

    /// Run a full page load and inject the sidebar into `document`.
    pub async fn apply(&self, location: &str, document: &str) -> Injection {
        let load = self.load(location).await;
        let fragment = self.render(&load);
        inject(document, &fragment, &self.anchor)
    }
}
