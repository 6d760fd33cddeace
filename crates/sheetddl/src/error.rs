//! Error types for the driver.

use std::path::PathBuf;

use sheetddl_core::SchemaError;

/// Errors that can occur while running the generator end to end.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A row or emission error from the core pipeline.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// IO error (reading config, writing output files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be opened or read.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// The config file is not valid JSON for [`crate::config::ConfigFile`].
    #[error("Invalid config file: {0}")]
    Config(#[from] serde_json::Error),

    /// A selected sheet lacks one of the required header labels.
    #[error("Sheet '{sheet}' has no '{header}' header")]
    MissingHeader {
        /// Sheet being read.
        sheet: String,
        /// The missing header label.
        header: String,
    },

    /// The workbook has no sheet of that name.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// No sheet name contains the configured pattern.
    #[error("No sheet name contains '{pattern}'")]
    NoMatchingSheets {
        /// The sheet name pattern.
        pattern: String,
    },

    /// Writing one output file failed.
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl DriverError {
    /// Returns the `(sheet, column, value)` triple of row-level errors.
    #[must_use]
    pub fn row_context(&self) -> Option<(&str, &str, &str)> {
        match self {
            Self::Schema(err) => err.row_context(),
            _ => None,
        }
    }
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;
