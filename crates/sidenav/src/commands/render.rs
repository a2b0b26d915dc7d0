//! `sidenav render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use sidenav_config::Config;
use sidenav_core::Sidebar;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Page location to render for (e.g. `/docs/buttons.html`).
    #[arg(short, long)]
    page: String,

    /// Write the fragment to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover sidenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the fragment cannot
    /// be written.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;

        let sidebar = Sidebar::new(config.sidebar_config())?;
        let sidebar = match config.manifest_locator() {
            Some(locator) => sidebar.with_manifest(locator),
            None => sidebar,
        };

        let load = sidebar.load(&self.page).await;
        let html = sidebar.render(&load);

        if let Some(path) = &self.output {
            std::fs::write(path, &html)?;
            Output::new().success(&format!(
                "Rendered sidebar for {} to {}",
                load.current_page,
                path.display()
            ));
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
        Ok(())
    }
}
