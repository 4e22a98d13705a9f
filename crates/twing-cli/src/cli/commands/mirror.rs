//! `twing mirror` – load the workbook and mirror every actionable record.

use anyhow::{Context, Result};
use twing_core::config::MirrorConfig;
use twing_core::fetch::CurlFetcher;
use twing_core::mirror::{self, MirrorOptions, MirrorSummary};
use twing_core::workbook;

pub async fn run_mirror(cfg: MirrorConfig, opts: MirrorOptions) -> Result<()> {
    let dry_run = opts.dry_run;
    tracing::info!(
        input = %cfg.input_file.display(),
        backup_root = %cfg.backup_root.display(),
        dry_run,
        "starting mirror"
    );

    // Sequential blocking transfers; keep them off the async worker threads.
    let summary = tokio::task::spawn_blocking(move || -> Result<MirrorSummary> {
        let sheets = workbook::load(&cfg.input_file).context("failed to load input workbook")?;
        let fetcher = CurlFetcher::from_config(&cfg);
        let summary = mirror::run(&sheets, &cfg, &opts, &fetcher)?;
        Ok(summary)
    })
    .await
    .context("mirror task join")??;

    print!("{}", completion_report(&summary, dry_run));
    Ok(())
}

/// Final stdout output of a run: the tallies, then the completion message.
pub fn completion_report(summary: &MirrorSummary, dry_run: bool) -> String {
    let message = if dry_run {
        "Dry run complete; nothing was downloaded."
    } else {
        "Mirror complete."
    };
    format!("{}\n{}\n", summary, message)
}
