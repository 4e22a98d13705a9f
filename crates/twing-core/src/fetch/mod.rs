//! Download primitive: one HTTP GET streamed into a file.
//!
//! Uses the curl crate (libcurl). Only a 200 response body ever reaches the
//! disk, and only through a `.part` temp file that is renamed onto the
//! destination once the transfer has fully completed. Every failure removes
//! the temp file, so a failed fetch never leaves anything at `dest`.
//!
//! No overall timeout and no retry; callers decide what a failure means.

mod temp;

pub use temp::temp_path;
pub(crate) use temp::TEMP_SUFFIX;

use std::cell::Cell;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::config::MirrorConfig;
use temp::TempFile;

/// Why a single download failed. Never fatal for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with something other than 200 OK.
    #[error("HTTP status {0}")]
    BadStatus(u32),
    /// DNS, connect, TLS, reset, or truncated transfer.
    #[error("network error: {0}")]
    Network(#[from] curl::Error),
    /// Writing, syncing, or renaming the local file failed.
    #[error("write error: {0}")]
    Write(#[from] io::Error),
}

/// Fetches `url` into `dest`, returning the number of bytes written.
///
/// Implementations must leave no file at `dest` when they return an error.
pub trait Fetch {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

/// libcurl-backed fetcher. One easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    /// `None` leaves connection setup to libcurl's own behavior.
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl CurlFetcher {
    pub fn new(connect_timeout: Option<Duration>, user_agent: Option<String>) -> Self {
        Self {
            connect_timeout,
            user_agent,
        }
    }

    pub fn from_config(cfg: &MirrorConfig) -> Self {
        Self::new(
            (cfg.connect_timeout_secs > 0).then(|| Duration::from_secs(cfg.connect_timeout_secs)),
            cfg.user_agent.clone(),
        )
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::from_config(&MirrorConfig::default())
    }
}

/// Status code from an HTTP status line ("HTTP/1.1 404 Not Found", "HTTP/2 200").
fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        if let Some(timeout) = self.connect_timeout {
            easy.connect_timeout(timeout)?;
        }
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        let mut temp = TempFile::new(dest);
        // Status of the most recent response; redirects replace it.
        let status = Cell::new(0u32);
        let mut write_err: Option<io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|line| {
                if let Some(code) = parse_status_line(line) {
                    status.set(code);
                }
                true
            })?;
            transfer.write_function(|data| {
                if status.get() != 200 {
                    // Error bodies are drained, never written.
                    return Ok(data.len());
                }
                match temp.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::Write(e));
        }
        performed?;

        let code = easy.response_code()?;
        if code != 200 {
            return Err(FetchError::BadStatus(code));
        }

        Ok(temp.commit(dest)?)
    }
}
