//! `sidenav check` command implementation.

use std::path::PathBuf;

use clap::Args;
use sidenav_config::Config;
use sidenav_core::{NavNode, Sidebar};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover sidenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        // Also rejects main-content classes that cannot be matched
        Sidebar::new(config.sidebar_config())?;

        match &config.config_path {
            Some(path) => output.heading(&format!("Configuration: {}", path.display())),
            None => output.heading("Configuration: defaults (no sidenav.toml found)"),
        }
        output.info(&format!("Site: {}", config.site_resolved.dir.display()));
        output.info(&format!(
            "Main content: .{}",
            config.site_resolved.main_content
        ));

        for section in &config.navigation.sections {
            let children: usize = section
                .items
                .iter()
                .map(|node| match node {
                    NavNode::Parent(parent) => parent.children.len(),
                    NavNode::Leaf(_) => 0,
                })
                .sum();
            output.info(&format!(
                "Section \"{}\": {} items, {children} children{}",
                section.title,
                section.items.len(),
                if section.collapsible { " (collapsible)" } else { "" }
            ));
        }
        output.info(&format!(
            "Listed pages: {}",
            config.navigation.listed_pages().len()
        ));

        if config.discovery.enabled {
            match config.manifest_locator() {
                Some(locator) => output.info(&format!("Discovery: enabled, manifest {locator}")),
                None => output.info("Discovery: enabled, current page only (no manifest)"),
            }
        } else {
            output.info("Discovery: disabled");
        }

        output.success("Configuration is valid");
        Ok(())
    }
}
