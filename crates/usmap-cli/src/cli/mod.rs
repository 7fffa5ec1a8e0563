//! CLI for fetching and inspecting cached mapping files.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use usmap_core::config::{self, UsmapConfig};
use usmap_core::ResolverSettings;

use commands::{run_checksum, run_completions, run_fetch, run_list};

/// Top-level CLI for usmap.
#[derive(Debug, Parser)]
#[command(name = "usmap")]
#[command(about = "Fetch .usmap mapping files, falling back to the local cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve the current mapping file and print its path.
    Fetch {
        /// Mappings cache directory (overrides config).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
        /// Metadata endpoint URL (overrides config).
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// Skip the network and use the newest cached file.
        #[arg(long)]
        offline: bool,
    },

    /// List cached mapping files, newest first.
    List {
        /// Mappings cache directory (overrides config).
        #[arg(long, value_name = "DIR")]
        cache_dir: Option<PathBuf>,
    },

    /// Compute SHA-256 of a file (e.g. a cached mapping).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Apply command-line overrides on top of the loaded config. The XDG cache
/// dir is only looked up when neither flag nor config names one.
fn settings_for(
    cfg: &UsmapConfig,
    cache_dir: Option<PathBuf>,
    endpoint: Option<String>,
) -> Result<ResolverSettings> {
    let cache_dir = match cache_dir {
        Some(dir) => dir,
        None => cfg.resolved_cache_dir()?,
    };
    let mut settings = ResolverSettings::from_config(cfg, cache_dir);
    if let Some(url) = endpoint {
        settings.endpoint = url;
    }
    Ok(settings)
}

/// Config from disk, or built-in defaults when the XDG config dir is unusable
/// (command-line overrides may still make the run succeed).
fn load_config() -> UsmapConfig {
    config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("using default config: {:#}", e);
        UsmapConfig::default()
    })
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch {
                cache_dir,
                endpoint,
                offline,
            } => {
                let cfg = load_config();
                tracing::debug!("loaded config: {:?}", cfg);
                run_fetch(settings_for(&cfg, cache_dir, endpoint)?, offline).await?;
            }
            CliCommand::List { cache_dir } => {
                let cfg = load_config();
                let dir = match cache_dir {
                    Some(dir) => dir,
                    None => cfg.resolved_cache_dir()?,
                };
                run_list(&dir)?;
            }
            CliCommand::Checksum { path } => run_checksum(&path)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}
