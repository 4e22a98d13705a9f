use std::fmt;

use super::RecordOutcome;

/// Per-outcome tallies for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorSummary {
    pub downloaded: usize,
    pub skipped_existing: usize,
    pub skipped_invalid: usize,
    pub failed: usize,
    /// Records a dry run would have downloaded.
    pub planned: usize,
}

impl MirrorSummary {
    pub fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Invalid(_) => self.skipped_invalid += 1,
            RecordOutcome::AlreadyPresent(_) => self.skipped_existing += 1,
            RecordOutcome::Planned(_) => self.planned += 1,
            RecordOutcome::Downloaded { .. } => self.downloaded += 1,
            RecordOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Records seen, whatever their outcome.
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped_existing + self.skipped_invalid + self.failed + self.planned
    }
}

impl fmt::Display for MirrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "downloaded: {}, already present: {}, invalid: {}, failed: {}",
            self.downloaded, self.skipped_existing, self.skipped_invalid, self.failed
        )?;
        if self.planned > 0 {
            write!(f, ", would download: {}", self.planned)?;
        }
        Ok(())
    }
}
