//! CLI entry and dispatch.

use std::fs;
use std::path::PathBuf;

use adx_core::config::paths;
use adx_core::{Config, Dataset, catalog};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adx")]
#[command(version)]
#[command(about = "Interactive terminal browser for atomic reference data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog file to load at startup, skipping the catalog prompt
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Directory scanned for .adx catalog files
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog files found in the data directory
    Catalogs,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the config file location
    Path,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }
    if let Some(catalog) = cli.catalog {
        config.catalog = Some(catalog);
    }

    match cli.command {
        Some(Commands::Catalogs) => list_catalogs(&config),
        Some(Commands::Config {
            command: ConfigCommands::Path,
        }) => {
            println!("{}", paths::config_path().display());
            Ok(())
        }
        None => browse(&config),
    }
}

fn list_catalogs(config: &Config) -> Result<()> {
    let data_dir = config.data_dir();
    let entries = catalog::discover(&data_dir)?;
    if entries.is_empty() {
        println!("No catalogs found in {}", data_dir.display());
        return Ok(());
    }
    for entry in entries {
        println!("{}\t{}", entry.name, entry.path.display());
    }
    Ok(())
}

fn browse(config: &Config) -> Result<()> {
    // Keep the guard alive for the whole session so buffered log lines are
    // flushed on exit.
    let _log_guard = init_logging(config)?;

    let dataset = match config.catalog.as_ref() {
        Some(path) => Some(
            Dataset::load(path)
                .with_context(|| format!("Cannot load startup catalog {}", path.display()))?,
        ),
        None => None,
    };

    info!(version = env!("CARGO_PKG_VERSION"), "starting adx");
    adx_tui::run_browser(config, dataset)
}

/// Sends `tracing` output to a file; the TUI owns the terminal, so logs can
/// never go to stdout/stderr.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let log_file = config.log_file();
    let dir = log_file.parent().unwrap_or_else(|| std::path::Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let file_name = log_file
        .file_name()
        .map_or_else(|| "adx.log".into(), |n| n.to_string_lossy().into_owned());

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("ADX_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
