//! sidenav CLI - Sidebar navigation for static sites.
//!
//! Provides commands for:
//! - `build`: Inject the sidebar into every page of a built site
//! - `render`: Write the sidebar fragment for a single page
//! - `check`: Validate configuration

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, RenderArgs};
use error::CliError;
use output::Output;

/// sidenav - Sidebar navigation for static sites.
#[derive(Parser)]
#[command(name = "sidenav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inject the sidebar into every page of the site.
    Build(BuildArgs),
    /// Render the sidebar fragment for one page.
    Render(RenderArgs),
    /// Validate configuration and print a summary.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => block_on(args.execute()),
        Commands::Render(args) => block_on(args.execute()),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Run an async command on a fresh tokio runtime.
fn block_on(command: impl Future<Output = Result<(), CliError>>) -> Result<(), CliError> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(command)
}
