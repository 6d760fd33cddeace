//! Generate per-database DDL files from a spreadsheet schema definition.
//!
//! Each selected sheet of the workbook describes one table, one row per
//! column. `sheetddl` validates those rows with [`sheetddl_core`] and writes
//! one `<dialect>.sql` file per target database.
//!
//! # Architecture
//!
//! - **Config** - [`config::Config`], layered from defaults, a JSON file and
//!   command-line flags
//! - **Workbook** - [`workbook::WorkbookSource`], backed by calamine
//! - **Output** - [`output::OutputSink`], to disk or stdout
//! - **Driver** - [`driver::Driver`], which renders everything in memory
//!   before writing anything
//!
//! # CLI Usage
//!
//! ```bash
//! # Write sql/sqlite.sql, sql/mysql.sql, ... from the SDM_ sheets
//! sheetddl schema.xlsx
//!
//! # Only PostgreSQL and Oracle, into ddl/
//! sheetddl schema.xlsx -d postgresql -d oracle -o ddl
//!
//! # Print instead of writing
//! sheetddl schema.xlsx --dry-run
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod workbook;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{Config, ConfigFile};
    pub use crate::driver::{report, Driver, RenderedScript};
    pub use crate::error::{DriverError, Result};
    pub use crate::output::{FsOutput, MemoryOutput, OutputSink, StdoutOutput};
    pub use crate::workbook::{CalamineWorkbook, MemoryWorkbook, SheetRows, WorkbookSource};
    pub use sheetddl_core::dialect::Dialect;
}
