//! CLI for twing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use twing_core::config::{self, MirrorConfig};
use twing_core::mirror::MirrorOptions;

use commands::{run_config, run_mirror, run_sheets};

/// Top-level CLI for twing.
#[derive(Debug, Parser)]
#[command(name = "twing")]
#[command(about = "twing: mirror images listed in an xlsx workbook into a local folder tree", long_about = None)]
pub struct Cli {
    /// Log to ~/.local/state/twing/twing.log instead of stderr.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every listed image that is not already in the backup folder.
    Mirror {
        /// Workbook to read (overrides `input_file` in config.toml).
        #[arg(long, short = 'i', value_name = "PATH")]
        input: Option<PathBuf>,

        /// Backup folder (overrides `backup_root` in config.toml).
        #[arg(long, short = 'o', value_name = "PATH")]
        backup_root: Option<PathBuf>,

        /// Only process this sheet. Repeatable.
        #[arg(long = "sheet", value_name = "NAME")]
        sheets: Vec<String>,

        /// Report what would be downloaded without creating folders or fetching.
        #[arg(long)]
        dry_run: bool,
    },

    /// List sheets with their record counts.
    Sheets {
        /// Workbook to read (overrides `input_file` in config.toml).
        #[arg(long, short = 'i', value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Show the config file location and the effective settings.
    Config,
}

/// CLI values take precedence over the config file.
fn apply_overrides(
    mut cfg: MirrorConfig,
    input: Option<PathBuf>,
    backup_root: Option<PathBuf>,
) -> MirrorConfig {
    if let Some(p) = input {
        cfg.input_file = p;
    }
    if let Some(p) = backup_root {
        cfg.backup_root = p;
    }
    cfg
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Mirror {
                input,
                backup_root,
                sheets,
                dry_run,
            } => {
                let cfg = apply_overrides(cfg, input, backup_root);
                run_mirror(cfg, MirrorOptions { dry_run, sheets }).await?;
            }
            CliCommand::Sheets { input } => {
                let cfg = apply_overrides(cfg, input, None);
                run_sheets(cfg).await?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
