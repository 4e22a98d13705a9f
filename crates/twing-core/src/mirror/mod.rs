//! Mirror driver: walks sheets and records in order and makes sure each
//! actionable record has its image on disk.
//!
//! Per record: plan → existence probe → ensure sheet folder → fetch. Every
//! per-record problem becomes a logged, counted outcome; only an unusable
//! media base URL or an uncreatable backup root abort the run, and both are
//! detected before the first record is touched.

mod summary;

pub use summary::MirrorSummary;

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::MirrorConfig;
use crate::fetch::{Fetch, FetchError};
use crate::plan::{BaseUrlError, MirrorTarget, Planner, ValidationError};
use crate::workbook::{Record, Sheet};

/// Run-level knobs that are not part of the persisted configuration.
#[derive(Debug, Clone, Default)]
pub struct MirrorOptions {
    /// Plan and probe only; no folders are created and nothing is fetched.
    pub dry_run: bool,
    /// When non-empty, only sheets with these names are processed.
    pub sheets: Vec<String>,
}

impl MirrorOptions {
    fn wants_sheet(&self, name: &str) -> bool {
        self.sheets.is_empty() || self.sheets.iter().any(|s| s == name)
    }
}

/// Fatal, run-level failure.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error(transparent)]
    BaseUrl(#[from] BaseUrlError),
    #[error("cannot create backup root {}: {source}", path.display())]
    BackupRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why an actionable record was not mirrored.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("cannot create folder {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot check {}: {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Terminal state of one record.
#[derive(Debug)]
pub enum RecordOutcome {
    Invalid(ValidationError),
    AlreadyPresent(PathBuf),
    /// Dry run only: the record would be downloaded.
    Planned(MirrorTarget),
    Downloaded { path: PathBuf, bytes: u64 },
    Failed { target: MirrorTarget, error: RecordError },
}

/// Mirrors every record of `sheets`, strictly in order, one download at a time.
pub fn run(
    sheets: &[Sheet],
    cfg: &MirrorConfig,
    opts: &MirrorOptions,
    fetcher: &dyn Fetch,
) -> Result<MirrorSummary, MirrorError> {
    let planner = Planner::new(cfg)?;

    if !opts.dry_run {
        fs::create_dir_all(&cfg.backup_root).map_err(|source| MirrorError::BackupRoot {
            path: cfg.backup_root.clone(),
            source,
        })?;
    }

    let mut summary = MirrorSummary::default();
    for sheet in sheets {
        if !opts.wants_sheet(&sheet.name) {
            tracing::debug!(sheet = %sheet.name, "sheet not selected, skipping");
            continue;
        }
        tracing::info!(
            sheet = %sheet.name,
            records = sheet.records.len(),
            "processing sheet"
        );
        for record in &sheet.records {
            let outcome = mirror_record(&planner, &sheet.name, record, opts.dry_run, fetcher);
            log_outcome(&outcome);
            summary.record(&outcome);
        }
    }

    tracing::info!("mirror finished: {}", summary);
    Ok(summary)
}

/// Drives one record to a terminal outcome. Never panics, never aborts.
pub fn mirror_record(
    planner: &Planner,
    sheet: &str,
    record: &Record,
    dry_run: bool,
    fetcher: &dyn Fetch,
) -> RecordOutcome {
    let target = match planner.plan(sheet, record) {
        Ok(t) => t,
        Err(e) => return RecordOutcome::Invalid(e),
    };
    if target.sanitized {
        tracing::warn!(
            "sheet \"{}\" {}: unsafe characters replaced, destination {} may be shared with another record",
            sheet,
            record,
            target.dest_path.display()
        );
    }

    match target.dest_path.try_exists() {
        Ok(true) => return RecordOutcome::AlreadyPresent(target.dest_path),
        Ok(false) => {}
        Err(source) => {
            let error = RecordError::Probe {
                path: target.dest_path.clone(),
                source,
            };
            return RecordOutcome::Failed { target, error };
        }
    }

    if dry_run {
        return RecordOutcome::Planned(target);
    }

    if let Err(source) = fs::create_dir_all(&target.sheet_dir) {
        let error = RecordError::CreateDir {
            path: target.sheet_dir.clone(),
            source,
        };
        return RecordOutcome::Failed { target, error };
    }

    tracing::info!("downloading {} -> {}", target.url, target.dest_path.display());
    match fetcher.fetch(&target.url, &target.dest_path) {
        Ok(bytes) => RecordOutcome::Downloaded {
            path: target.dest_path,
            bytes,
        },
        Err(e) => RecordOutcome::Failed {
            target,
            error: e.into(),
        },
    }
}

fn log_outcome(outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Invalid(e) => tracing::warn!("skipping incomplete record: {}", e),
        RecordOutcome::AlreadyPresent(path) => {
            tracing::info!("already present: {}", path.display())
        }
        RecordOutcome::Planned(t) => {
            tracing::info!("would download {} -> {}", t.url, t.dest_path.display())
        }
        RecordOutcome::Downloaded { path, bytes } => {
            tracing::info!("saved {} ({} bytes)", path.display(), bytes)
        }
        RecordOutcome::Failed { target, error } => {
            tracing::error!("download failed for {}: {}", target.url, error)
        }
    }
}
