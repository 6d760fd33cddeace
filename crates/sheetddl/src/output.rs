//! Output sinks for rendered DDL.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DriverError, Result};

/// Destination of rendered scripts.
pub trait OutputSink {
    /// Writes `text` as the content of `path`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be written.
    fn write(&mut self, path: &Path, text: &str) -> Result<()>;
}

/// Writes files to disk, creating parent directories as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOutput;

impl OutputSink for FsOutput {
    fn write(&mut self, path: &Path, text: &str) -> Result<()> {
        let to_write_error = |source| DriverError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(to_write_error)?;
        }
        std::fs::write(path, text).map_err(to_write_error)?;
        debug!(path = %path.display(), "wrote file");
        Ok(())
    }
}

/// Prints scripts to stdout under a `-- <path>` banner.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutOutput;

impl OutputSink for StdoutOutput {
    fn write(&mut self, path: &Path, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(dry_run_text(path, text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Keeps written scripts in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryOutput {
    /// Scripts in write order.
    pub files: Vec<(PathBuf, String)>,
}

impl MemoryOutput {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last text written to `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, text)| text.as_str())
    }
}

impl OutputSink for MemoryOutput {
    fn write(&mut self, path: &Path, text: &str) -> Result<()> {
        self.files.push((path.to_path_buf(), text.to_string()));
        Ok(())
    }
}

/// Formats one script the way a dry run prints it.
#[must_use]
pub fn dry_run_text(path: &Path, text: &str) -> String {
    format!("-- {}\n{text}\n", path.display())
}
