//! Configuration management for sidenav.
//!
//! Parses `sidenav.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `discovery.manifest`
//!
//! ## Example
//!
//! ```toml
//! [site]
//! dir = "site"
//!
//! [discovery]
//! enabled = true
//! manifest = "pages.json"
//! excluded = ["404.html"]
//!
//! [[sections]]
//! title = "Components"
//!
//! [[sections.items]]
//! name = "Buttons"
//! href = "buttons.html"
//!
//! [[sections.items]]
//! name = "Cards"
//! children = [
//!     { name = "Product Cards", href = "product-cards.html" },
//! ]
//! ```

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sidenav_core::{
    DEFAULT_ANCHOR_CLASS, DEFAULT_PAGE, DiscoveryConfig, ManifestLocator, NavError, NavTree,
    SidebarConfig,
};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site directory.
    pub site_dir: Option<PathBuf>,
    /// Override manifest locator.
    pub manifest: Option<String>,
    /// Override discovery enabled flag.
    pub discovery_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sidenav.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Discovery of pages missing from the navigation.
    pub discovery: DiscoveryConfig,
    /// Declarative navigation tree.
    #[serde(rename = "sections")]
    pub navigation: NavTree,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    dir: Option<String>,
    default_page: Option<String>,
    main_content: Option<String>,
}

/// Resolved site configuration with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory holding the built HTML pages.
    pub dir: PathBuf,
    /// Page used when a location names a directory.
    pub default_page: String,
    /// Class of the element the sidebar is inserted before.
    pub main_content: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Navigation tree error.
    #[error("Configuration error: {0}")]
    Navigation(#[from] NavError),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`discovery.manifest`").
        field: String,
        /// Error message (e.g., "${`MANIFEST_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sidenav.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the navigation tree is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_dir) = &settings.site_dir {
            self.site_resolved.dir.clone_from(site_dir);
        }
        if let Some(manifest) = &settings.manifest {
            self.discovery.manifest = Some(manifest.clone());
        }
        if let Some(enabled) = settings.discovery_enabled {
            self.discovery.enabled = enabled;
        }
    }

    /// Sidebar settings for the core engine.
    #[must_use]
    pub fn sidebar_config(&self) -> SidebarConfig {
        SidebarConfig {
            tree: self.navigation.clone(),
            discovery: self.discovery.clone(),
            default_page: self.site_resolved.default_page.clone(),
            anchor_class: self.site_resolved.main_content.clone(),
        }
    }

    /// Manifest location, with relative paths resolved against the site
    /// directory.
    #[must_use]
    pub fn manifest_locator(&self) -> Option<ManifestLocator> {
        self.discovery
            .manifest
            .as_deref()
            .map(|locator| ManifestLocator::parse(locator, &self.site_resolved.dir))
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            discovery: DiscoveryConfig::default(),
            navigation: NavTree::default(),
            site_resolved: SiteConfig {
                dir: base.join("site"),
                default_page: DEFAULT_PAGE.to_owned(),
                main_content: DEFAULT_ANCHOR_CLASS.to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks site settings, discovery settings and the navigation tree.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for invalid settings and
    /// `ConfigError::Navigation` for an invalid tree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_discovery()?;
        self.navigation.validate()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_resolved.default_page, "site.default_page")?;
        require_non_empty(&self.site_resolved.main_content, "site.main_content")?;
        Ok(())
    }

    /// Validate discovery configuration.
    fn validate_discovery(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.discovery.page_suffix, "discovery.page_suffix")?;

        if self.discovery.enabled {
            require_non_empty(&self.discovery.section_title, "discovery.section_title")?;
        }

        if let Some(manifest) = &self.discovery.manifest {
            require_non_empty(manifest, "discovery.manifest")?;
            if manifest.contains("://")
                && !manifest.starts_with("http://")
                && !manifest.starts_with("https://")
            {
                return Err(ConfigError::Validation(
                    "discovery.manifest URL must start with http:// or https://".to_owned(),
                ));
            }
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref manifest) = self.discovery.manifest {
            self.discovery.manifest = Some(expand::expand_env(manifest, "discovery.manifest")?);
        }
        Ok(())
    }

    /// Resolve relative paths and defaults based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_resolved = SiteConfig {
            dir: config_dir.join(self.site.dir.as_deref().unwrap_or("site")),
            default_page: self
                .site
                .default_page
                .clone()
                .unwrap_or_else(|| DEFAULT_PAGE.to_owned()),
            main_content: self
                .site
                .main_content
                .clone()
                .unwrap_or_else(|| DEFAULT_ANCHOR_CLASS.to_owned()),
        };
    }
}
