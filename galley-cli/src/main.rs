//! # galley CLI
//!
//! Command-line interface for the galley documentation site builder.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "galley")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "galley.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new galley project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Check source documents without writing any output
    Check {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Build the site into the output directory
    Build,

    /// Publish previously built output to the configured target
    Publish,

    /// Build the site, then publish it
    Deploy,

    /// Serve the site locally, rebuilding on source changes
    Serve {
        /// Server port
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Write a GitHub Actions workflow that deploys on push
    Ci {
        /// GitHub repository name (e.g., "username/repo")
        #[arg(long)]
        repo: Option<String>,

        /// Force overwrite existing workflow
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Check { json } => commands::check_sources(&cli.config, json),
        Commands::Build => commands::build_site(&cli.config),
        Commands::Publish => commands::publish_output(&cli.config),
        Commands::Deploy => commands::deploy_site(&cli.config),
        Commands::Serve { port } => commands::serve_site(&cli.config, port).await,
        Commands::Ci { repo, force } => commands::setup_ci(repo.as_deref(), force),
    }
}
