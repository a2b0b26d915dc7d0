//! Navigation-tree state engine for static multi-page sites.
//!
//! This crate provides:
//! - [`NavTree`]: declarative sections, links and one level of child links
//! - [`discover`]: unlisted pages from a site manifest, with a
//!   current-page fallback
//! - [`derive`]: active/expanded state for the current page
//! - [`render`] and [`inject`]: sidebar markup placed before the main content
//! - [`ViewState`]: client-side expand/collapse toggles
//! - [`Sidebar`]: the whole pipeline for one page load
//!
//! # Quick Start
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use sidenav_core::{Injection, Leaf, ManifestLocator, NavSection, NavTree, Sidebar, SidebarConfig};
//!
//! let config = SidebarConfig {
//!     tree: NavTree::new(vec![NavSection::new(
//!         "Components",
//!         vec![Leaf::new("Buttons", "buttons.html").into()],
//!     )]),
//!     ..SidebarConfig::default()
//! };
//! let sidebar = Sidebar::new(config)?
//!     .with_manifest(ManifestLocator::parse("pages.json", Path::new("site")));
//!
//! let document = std::fs::read_to_string("site/buttons.html")?;
//! if let Injection::Injected(html) = sidebar.apply("buttons.html", &document).await {
//!     std::fs::write("site/buttons.html", html)?;
//! }
//! # Ok(())
//! # }
//! ```

mod discovery;
mod inject;
mod interaction;
mod manifest;
mod nav;
mod page;
mod render;
mod sidebar;
mod state;

pub use discovery::{DiscoveredEntry, DiscoveryConfig, discover};
pub use inject::{Anchor, END_MARKER, Injection, START_MARKER, inject};
pub use interaction::{BINDING_SCRIPT, ParseToggleIdError, ToggleId, ViewState, toggle_ids};
pub use manifest::{Manifest, ManifestError, ManifestLocator, ManifestSource};
pub use nav::{Leaf, NavError, NavNode, NavSection, NavTree, Parent};
pub use page::{DEFAULT_PAGE, DEFAULT_PAGE_SUFFIX, current_page, friendly_name, is_page};
pub use render::{STYLESHEET, render};
pub use sidebar::{DEFAULT_ANCHOR_CLASS, PageLoad, Sidebar, SidebarConfig, SidebarError};
pub use state::{NodeState, RenderState, SectionState, derive};
