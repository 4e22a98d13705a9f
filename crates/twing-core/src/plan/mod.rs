//! Path planner: turns a (sheet, record) pair into a media URL and a destination path.
//!
//! Pure and deterministic. The same record under the same configuration
//! always maps to the same file, which is what makes reruns idempotent.
//!
//! Layout: `{backup_root}/{sheet}/{sheet}-{date}-{hash}.{format}`
//! URL: `{media_base_url}/{hash}?format={format}&name={size}`

mod sanitize;

use sanitize::{is_safe_component, sanitize_component, NAME_MAX};

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::config::MirrorConfig;
use crate::fetch::TEMP_SUFFIX;
use crate::workbook::Record;

/// Where a record's image comes from and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorTarget {
    pub url: String,
    /// `{backup_root}/{sheet}`; created on demand by the driver.
    pub sheet_dir: PathBuf,
    pub dest_path: PathBuf,
    /// Sheet name, date or hash had characters replaced to fit the layout.
    /// Distinct values can then share a destination.
    pub sanitized: bool,
}

/// Why a record is not actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    MissingDate,
    MissingHash,
    /// The named value cannot be used as a path component (empty, `.` or `..` after sanitizing).
    UnsafeComponent(&'static str),
    /// The file name, with the download's temp suffix, exceeds NAME_MAX bytes.
    NameTooLong,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::MissingDate => write!(f, "missing date"),
            InvalidReason::MissingHash => write!(f, "missing hash"),
            InvalidReason::UnsafeComponent(field) => write!(f, "{} is not a usable path component", field),
            InvalidReason::NameTooLong => {
                write!(f, "file name longer than {} bytes", NAME_MAX - TEMP_SUFFIX.len())
            }
        }
    }
}

/// A record that cannot be planned. Carries the record for diagnostics; never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sheet \"{sheet}\" {record}: {reason}")]
pub struct ValidationError {
    pub sheet: String,
    pub record: Record,
    pub reason: InvalidReason,
}

/// The configured media base URL is unusable. Fatal before any record is processed.
#[derive(Debug, Error)]
pub enum BaseUrlError {
    #[error("invalid media base URL {url:?}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("media base URL {0:?} cannot carry a path")]
    NotABase(String),
}

/// Plans targets under one configuration.
#[derive(Debug, Clone)]
pub struct Planner {
    backup_root: PathBuf,
    base: Url,
    format: String,
    size: String,
}

impl Planner {
    pub fn new(cfg: &MirrorConfig) -> Result<Self, BaseUrlError> {
        let base = Url::parse(&cfg.media_base_url).map_err(|source| BaseUrlError::Parse {
            url: cfg.media_base_url.clone(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(BaseUrlError::NotABase(cfg.media_base_url.clone()));
        }
        Ok(Self {
            backup_root: cfg.backup_root.clone(),
            base,
            format: cfg.image_format.clone(),
            size: cfg.image_size.clone(),
        })
    }

    /// Media URL for `hash`. The hash is percent-encoded as one path segment.
    pub fn url_for(&self, hash: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(hash);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("format", &self.format)
            .append_pair("name", &self.size);
        url.into()
    }

    /// Validates `record` and computes its URL and destination.
    pub fn plan(&self, sheet: &str, record: &Record) -> Result<MirrorTarget, ValidationError> {
        let invalid = |reason| ValidationError {
            sheet: sheet.to_string(),
            record: record.clone(),
            reason,
        };

        let date = non_empty(record.date.as_deref()).ok_or_else(|| invalid(InvalidReason::MissingDate))?;
        let hash = non_empty(record.hash.as_deref()).ok_or_else(|| invalid(InvalidReason::MissingHash))?;

        let sheet_part = sanitize_component(sheet);
        if !is_safe_component(&sheet_part) {
            return Err(invalid(InvalidReason::UnsafeComponent("sheet name")));
        }
        let date_part = sanitize_component(date);
        let hash_part = sanitize_component(hash);
        let sanitized = sheet_part != sheet || date_part != date || hash_part != hash;
        let file_name = format!(
            "{}-{}-{}.{}",
            sheet_part,
            date_part,
            hash_part,
            sanitize_component(&self.format)
        );
        // The fetch writes `{file_name}.part` first; that name must fit too.
        if file_name.len() + TEMP_SUFFIX.len() > NAME_MAX {
            return Err(invalid(InvalidReason::NameTooLong));
        }

        let sheet_dir = self.backup_root.join(&sheet_part);
        let dest_path = sheet_dir.join(file_name);
        Ok(MirrorTarget {
            url: self.url_for(hash),
            sheet_dir,
            dest_path,
            sanitized,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
