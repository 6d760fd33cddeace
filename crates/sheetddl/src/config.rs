//! Run configuration.
//!
//! A [`Config`] is built from built-in defaults, then an optional JSON
//! [`ConfigFile`], then command-line flags, each layer overriding the last.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use sheetddl_core::dialect::{Dialect, DialectDescriptor};
use sheetddl_core::row::HeaderLabels;

use crate::error::Result;

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "sql";

/// Default sheet name pattern.
pub const DEFAULT_SHEET_PATTERN: &str = "SDM_";

/// Everything the driver needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Workbook to read.
    pub spec_file: PathBuf,
    /// Directory receiving `<dialect>.sql` files.
    pub output_dir: PathBuf,
    /// Sheets whose names contain this text are processed.
    pub sheet_pattern: String,
    /// Dialects to render, in output order.
    pub dialects: Vec<Dialect>,
    /// Identifier length limits overriding the built-in ones.
    pub identifier_limits: BTreeMap<Dialect, usize>,
    /// Header labels of the schema sheets.
    pub headers: HeaderLabels,
    /// Print DDL to stdout instead of writing files.
    pub dry_run: bool,
}

impl Config {
    /// Creates a configuration with default settings for `spec_file`.
    #[must_use]
    pub fn new(spec_file: impl Into<PathBuf>) -> Self {
        Self {
            spec_file: spec_file.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sheet_pattern: DEFAULT_SHEET_PATTERN.to_string(),
            dialects: Dialect::DEFAULTS.to_vec(),
            identifier_limits: BTreeMap::new(),
            headers: HeaderLabels::default(),
            dry_run: false,
        }
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the sheet name pattern.
    #[must_use]
    pub fn sheet_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.sheet_pattern = pattern.into();
        self
    }

    /// Sets the dialects, dropping repeats.
    #[must_use]
    pub fn dialects(mut self, dialects: impl IntoIterator<Item = Dialect>) -> Self {
        self.dialects.clear();
        for dialect in dialects {
            if !self.dialects.contains(&dialect) {
                self.dialects.push(dialect);
            }
        }
        self
    }

    /// Overrides the identifier length limit of one dialect.
    #[must_use]
    pub fn identifier_limit(mut self, dialect: Dialect, max: usize) -> Self {
        self.identifier_limits.insert(dialect, max);
        self
    }

    /// Sets the header labels.
    #[must_use]
    pub fn headers(mut self, headers: HeaderLabels) -> Self {
        self.headers = headers;
        self
    }

    /// Enables or disables dry run.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Applies the settings present in a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if an `identifier_limits` key is not a dialect name.
    pub fn merge(mut self, file: ConfigFile) -> Result<Self> {
        if let Some(dir) = file.output_dir {
            self = self.output_dir(dir);
        }
        if let Some(pattern) = file.sheet_pattern {
            self = self.sheet_pattern(pattern);
        }
        if let Some(dialects) = file.dialects {
            self = self.dialects(dialects);
        }
        for (name, max) in file.identifier_limits {
            self = self.identifier_limit(name.parse()?, max);
        }
        if let Some(headers) = file.headers {
            self = self.headers(headers);
        }
        Ok(self)
    }

    /// Returns the descriptor used to render `dialect`.
    #[must_use]
    pub fn descriptor(&self, dialect: Dialect) -> DialectDescriptor {
        let descriptor = dialect.descriptor();
        match self.identifier_limits.get(&dialect) {
            Some(&max) => descriptor.with_max_identifier_length(max),
            None => descriptor,
        }
    }

    /// Returns the descriptors of every configured dialect, in order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<DialectDescriptor> {
        self.dialects.iter().map(|d| self.descriptor(*d)).collect()
    }

    /// Returns the output file for `dialect`.
    #[must_use]
    pub fn output_path(&self, dialect: Dialect) -> PathBuf {
        self.output_dir.join(format!("{}.sql", dialect.name()))
    }
}

/// Optional settings loaded from a JSON file.
///
/// ```json
/// {
///     "output_dir": "ddl",
///     "sheet_pattern": "TBL_",
///     "dialects": ["postgres", "oracle"],
///     "identifier_limits": { "oracle": 128 },
///     "headers": { "name": "Column", "type": "Type" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Directory receiving `<dialect>.sql` files.
    pub output_dir: Option<PathBuf>,
    /// Sheet name pattern.
    pub sheet_pattern: Option<String>,
    /// Dialects to render, in output order.
    pub dialects: Option<Vec<Dialect>>,
    /// Identifier length limits keyed by dialect name.
    pub identifier_limits: BTreeMap<String, usize>,
    /// Header labels, with missing ones left at their defaults.
    pub headers: Option<HeaderLabels>,
}

impl ConfigFile {
    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(file)
    }
}
