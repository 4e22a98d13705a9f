//! `twing config` – print the config file path and the effective settings.

use anyhow::Result;
use twing_core::config::{self, MirrorConfig};

pub fn run_config(cfg: &MirrorConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", config::to_toml(cfg)?);
    Ok(())
}
