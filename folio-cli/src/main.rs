//! Folio: keep track of project folders and which one you are working in.
//!
//! # Usage
//!
//! ```text
//! folio list [--json]
//! folio add <path>
//! folio remove <path> [--remove-files]
//! folio use <path>
//! folio current [--json]
//! folio show [<path>] [--json]
//! ```
//!
//! The registry lives in `~/.folio/data/config.json`; override the directory
//! with `--data-dir` or `FOLIO_DATA_DIR`.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    list::{CurrentArgs, ListArgs},
    project::{AddArgs, RemoveArgs, UseArgs},
    show::ShowArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Register project folders and switch between them",
    long_about = None,
)]
struct Cli {
    /// Directory holding the registry store (default: ~/.folio/data).
    #[arg(long, global = true, env = "FOLIO_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered projects.
    List(ListArgs),

    /// Register a project folder and make it current.
    Add(AddArgs),

    /// Unregister a project, optionally moving its folder to the trash.
    Remove(RemoveArgs),

    /// Make a registered project current.
    Use(UseArgs),

    /// Show the current project.
    Current(CurrentArgs),

    /// Inspect a project through its adapters.
    Show(ShowArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        let registry = commands::open_registry(cli.data_dir.as_deref()).await?;
        match cli.command {
            Commands::List(args) => args.run(&registry),
            Commands::Add(args) => args.run(&registry).await,
            Commands::Remove(args) => args.run(&registry).await,
            Commands::Use(args) => args.run(&registry).await,
            Commands::Current(args) => args.run(&registry),
            Commands::Show(args) => args.run(&registry),
        }
    })
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
