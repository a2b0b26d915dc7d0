//! `sidenav build` command implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use glob::Pattern;
use sidenav_config::{CliSettings, Config};
use sidenav_core::{Injection, Sidebar};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover sidenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built site directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Write pages here instead of updating the site in place.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Page manifest path or http(s) URL (overrides config).
    #[arg(long, env = "SIDENAV_MANIFEST")]
    manifest: Option<String>,

    /// Disable discovery of unlisted pages.
    #[arg(long)]
    no_discovery: bool,

    /// Enable verbose output (log every processed page).
    #[arg(short, long)]
    pub verbose: bool,
}

/// A page file of the site.
#[derive(Debug, PartialEq, Eq)]
struct SitePage {
    /// Path relative to the site directory, `/`-separated.
    location: String,
    path: PathBuf,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or a page cannot be
    /// read or written.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir,
            manifest: self.manifest,
            discovery_enabled: self.no_discovery.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let site_dir = &config.site_resolved.dir;
        if !site_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "Site directory not found: {}",
                site_dir.display()
            )));
        }
        let output_dir = self.output_dir.as_deref().unwrap_or(site_dir);

        let sidebar = Sidebar::new(config.sidebar_config())?;
        let sidebar = match config.manifest_locator() {
            Some(locator) => {
                output.info(&format!("Manifest: {locator}"));
                sidebar.with_manifest(locator)
            }
            None => sidebar,
        };

        output.info(&format!("Site: {}", site_dir.display()));
        if output_dir != site_dir {
            output.info(&format!("Output: {}", output_dir.display()));
        }

        let pages = collect_pages(site_dir, &config.discovery.page_suffix)?;
        let mut injected = 0usize;
        let mut skipped = Vec::new();

        for page in &pages {
            let document = fs::read_to_string(&page.path)?;
            let html = match sidebar.apply(&page.location, &document).await {
                Injection::Injected(html) => {
                    tracing::info!(page = %page.location, "Injected sidebar");
                    injected += 1;
                    html
                }
                Injection::AnchorMissing => {
                    skipped.push(page.location.as_str());
                    if output_dir == site_dir {
                        continue;
                    }
                    document
                }
            };

            let target = output_dir.join(&page.location);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, html)?;
        }

        for location in &skipped {
            output.warning(&format!("Skipped {location}: no main-content element"));
        }
        output.success(&format!(
            "Injected sidebar into {injected} of {} pages",
            pages.len()
        ));
        Ok(())
    }
}

/// Collect every page under `site_dir` whose name ends with `suffix`.
///
/// Hidden files and directories are ignored. Pages are returned sorted by
/// location.
fn collect_pages(site_dir: &Path, suffix: &str) -> Result<Vec<SitePage>, CliError> {
    let pattern = Pattern::new(&format!("*{}", Pattern::escape(suffix)))?;
    let mut pages = Vec::new();
    walk_dir(site_dir, site_dir, &pattern, &mut pages)?;
    pages.sort_by(|a, b| a.location.cmp(&b.location));
    Ok(pages)
}

fn walk_dir(
    base: &Path,
    current: &Path,
    pattern: &Pattern,
    pages: &mut Vec<SitePage>,
) -> Result<(), io::Error> {
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            walk_dir(base, &path, pattern, pages)?;
        } else if pattern.matches(&name) {
            let Ok(relative) = path.strip_prefix(base) else {
                continue;
            };
            pages.push(SitePage {
                location: relative.to_string_lossy().replace('\\', "/"),
                path,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sidenav_core::START_MARKER;

    use super::*;

    const CONFIG: &str = r#"
[site]
dir = "site"

[discovery]
enabled = true

[[sections]]
title = "Components"

[[sections.items]]
name = "Overview"
href = "index.html"

[[sections.items]]
name = "Buttons"
href = "buttons.html"
"#;

    const PLAIN_PAGE: &str = "<html><body><main>No anchor</main></body></html>";

    fn page(title: &str) -> String {
        format!(
            "<html><head><title>{title}</title></head><body>\
             <main class=\"main-content\">{title}</main></body></html>"
        )
    }

    /// Project with a config and a small built site.
    fn create_project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        fs::create_dir_all(site.join("guides")).unwrap();
        fs::write(dir.path().join("sidenav.toml"), CONFIG).unwrap();
        fs::write(site.join("index.html"), page("Overview")).unwrap();
        fs::write(site.join("buttons.html"), page("Buttons")).unwrap();
        fs::write(site.join("guides/new-widget.html"), page("New Widget")).unwrap();
        fs::write(site.join("plain.html"), PLAIN_PAGE).unwrap();
        dir
    }

    fn build_args(project: &Path) -> BuildArgs {
        BuildArgs {
            config: Some(project.join("sidenav.toml")),
            site_dir: None,
            output_dir: None,
            manifest: None,
            no_discovery: false,
            verbose: false,
        }
    }

    fn read(path: PathBuf) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[tokio::test]
    async fn test_build_injects_in_place() {
        let project = create_project();
        let site = project.path().join("site");

        build_args(project.path()).execute().await.unwrap();

        let index = read(site.join("index.html"));
        assert_eq!(index.matches(START_MARKER).count(), 1);
        assert!(index.contains("aria-current=\"page\""));
        assert!(read(site.join("buttons.html")).contains(START_MARKER));
        assert_eq!(read(site.join("plain.html")), PLAIN_PAGE);
    }

    #[tokio::test]
    async fn test_build_twice_keeps_single_sidebar() {
        let project = create_project();
        let site = project.path().join("site");

        build_args(project.path()).execute().await.unwrap();
        let first = read(site.join("buttons.html"));
        build_args(project.path()).execute().await.unwrap();

        assert_eq!(read(site.join("buttons.html")), first);
    }

    #[tokio::test]
    async fn test_build_to_output_dir() {
        let project = create_project();
        let site = project.path().join("site");
        let out = project.path().join("out");
        let args = BuildArgs {
            output_dir: Some(out.clone()),
            ..build_args(project.path())
        };

        args.execute().await.unwrap();

        assert!(read(out.join("index.html")).contains(START_MARKER));
        assert!(read(out.join("guides/new-widget.html")).contains(START_MARKER));
        assert_eq!(read(out.join("plain.html")), PLAIN_PAGE);
        assert_eq!(read(site.join("index.html")), page("Overview"));
    }

    #[tokio::test]
    async fn test_build_discovers_unlisted_current_page() {
        let project = create_project();
        let site = project.path().join("site");

        build_args(project.path()).execute().await.unwrap();

        let widget = read(site.join("guides/new-widget.html"));
        assert!(widget.contains("Other Pages"));
        assert!(widget.contains("<a href=\"new-widget.html\" class=\"sidenav-item"));
        assert!(!read(site.join("index.html")).contains("Other Pages"));
    }

    #[tokio::test]
    async fn test_build_no_discovery_overrides_config() {
        let project = create_project();
        let site = project.path().join("site");
        let args = BuildArgs {
            no_discovery: true,
            ..build_args(project.path())
        };

        args.execute().await.unwrap();

        let widget = read(site.join("guides/new-widget.html"));
        assert!(widget.contains(START_MARKER));
        assert!(!widget.contains("Other Pages"));
    }

    #[tokio::test]
    async fn test_build_missing_site_dir() {
        let project = create_project();
        let args = BuildArgs {
            site_dir: Some(project.path().join("missing")),
            ..build_args(project.path())
        };

        let err = args.execute().await.unwrap_err();

        assert!(matches!(err, CliError::Validation(_)));
    }

    fn create_site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guides")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("index.html"), "").unwrap();
        fs::write(root.join("buttons.html"), "").unwrap();
        fs::write(root.join("guides/setup.html"), "").unwrap();
        fs::write(root.join("styles.css"), "").unwrap();
        fs::write(root.join(".draft.html"), "").unwrap();
        fs::write(root.join(".cache/old.html"), "").unwrap();
        dir
    }

    #[test]
    fn test_collect_pages_filters_by_suffix() {
        let site = create_site();

        let pages = collect_pages(site.path(), ".html").unwrap();

        let locations: Vec<_> = pages.iter().map(|p| p.location.as_str()).collect();
        assert_eq!(locations, vec!["buttons.html", "guides/setup.html", "index.html"]);
        assert_eq!(pages[1].path, site.path().join("guides/setup.html"));
    }

    #[test]
    fn test_collect_pages_custom_suffix() {
        let site = create_site();

        let pages = collect_pages(site.path(), ".css").unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].location, "styles.css");
    }

    #[test]
    fn test_collect_pages_suffix_is_literal() {
        let site = create_site();
        fs::write(site.path().join("page[1].htm"), "").unwrap();

        let pages = collect_pages(site.path(), "[1].htm").unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].location, "page[1].htm");
    }

    #[test]
    fn test_collect_pages_missing_dir() {
        let dir = tempfile::tempdir().unwrap();

        let result = collect_pages(&dir.path().join("missing"), ".html");

        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
