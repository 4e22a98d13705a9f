//! `twing sheets` – list sheets with record counts.

use anyhow::{Context, Result};
use twing_core::config::MirrorConfig;
use twing_core::plan::Planner;
use twing_core::workbook;

pub async fn run_sheets(cfg: MirrorConfig) -> Result<()> {
    let planner = Planner::new(&cfg)?;
    let path = cfg.input_file.clone();
    let sheets = tokio::task::spawn_blocking(move || workbook::load(&path))
        .await
        .context("workbook task join")?
        .context("failed to load input workbook")?;

    if sheets.is_empty() {
        println!("No sheets in {}.", cfg.input_file.display());
        return Ok(());
    }
    println!("{:<10} {:<10} {}", "RECORDS", "VALID", "SHEET");
    for sheet in &sheets {
        let valid = sheet
            .records
            .iter()
            .filter(|r| planner.plan(&sheet.name, r).is_ok())
            .count();
        println!("{:<10} {:<10} {}", sheet.records.len(), valid, sheet.name);
    }
    Ok(())
}
