//! Temp file lifecycle for a single download.
//!
//! The body is written to `{dest}.part` and atomically renamed onto `dest`
//! only after a complete, successful transfer. Dropping the guard without
//! committing removes the temp file, so no error path leaves an artifact.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub(crate) const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.png` → `a.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Lazily created temp file that is deleted on drop unless committed.
pub(super) struct TempFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    written: u64,
}

impl TempFile {
    pub(super) fn new(final_path: &Path) -> Self {
        Self {
            path: temp_path(final_path),
            writer: None,
            written: 0,
        }
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            // Truncates a stray temp file left by an interrupted run.
            let file = File::options()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)?;
            self.writer = Some(BufWriter::new(file));
        }
        match self.writer.as_mut() {
            Some(w) => Ok(w),
            None => Err(io::Error::new(io::ErrorKind::Other, "temp file not open")),
        }
    }

    pub(super) fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer()?.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flush, sync, close, then rename onto `final_path`. Returns bytes written.
    pub(super) fn commit(mut self, final_path: &Path) -> io::Result<u64> {
        // An empty 200 body still produces a (zero-length) file.
        let writer = self.writer()?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(self.writer.take());

        std::fs::rename(&self.path, final_path)?;
        let written = self.written;
        // Renamed away; nothing left for Drop to remove.
        self.path = PathBuf::new();
        Ok(written)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        drop(self.writer.take());
        if !self.path.as_os_str().is_empty() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => tracing::debug!(path = %self.path.display(), "removed temp file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %self.path.display(), "failed to remove temp file: {}", e),
            }
        }
    }
}
