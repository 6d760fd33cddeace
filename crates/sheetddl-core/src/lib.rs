//! Spreadsheet schema rows to dialect-specific DDL.
//!
//! `sheetddl-core` turns the rows of a schema-definition sheet (one sheet per
//! table, one row per column) into `CREATE TABLE` text for several databases.
//! It does no I/O: rows come in as [`schema::RawRow`]s and DDL goes out as
//! strings.
//!
//! # Pipeline
//!
//! - **Classify** - [`classify`] maps a type cell such as `VARCHAR(40)` to a
//!   [`schema::TypeTag`] and length, trying a fixed list of patterns in order.
//! - **Validate** - [`row::RowValidator`] checks the key, index and
//!   nullability markers and produces a [`schema::ColumnSpec`].
//! - **Build** - [`table::TableBuilder`] collects columns in row order and
//!   derives the composite unique constraint.
//! - **Emit** - [`dialect::DialectDescriptor`] renders a
//!   [`schema::TableSpec`] for one database.
//!
//! Every failure is a [`SchemaError`]; none is recoverable.
//!
//! # Example
//!
//! ```rust
//! use sheetddl_core::prelude::*;
//!
//! let headers = HeaderLabels::default();
//! let rows = vec![RawRow::new()
//!     .with(headers.name.clone(), "id")
//!     .with(headers.type_.clone(), "INT")
//!     .with(headers.key.clone(), "P")];
//!
//! let table = build_table("SDM_USER", &rows, &headers).unwrap();
//! let sql = Dialect::Postgresql.descriptor().render_table(&table).unwrap();
//! assert!(sql.starts_with("CREATE TABLE \"SDM_USER\""));
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod dialect;
pub mod error;
pub mod row;
pub mod schema;
pub mod table;

pub use error::{Result, SchemaError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::classify::{classify, classify_type};
    pub use crate::dialect::{Dialect, DialectDescriptor, TypeNames};
    pub use crate::error::{Result, SchemaError};
    pub use crate::row::{HeaderLabels, RowValidator};
    pub use crate::schema::{ColumnSpec, RawRow, SqlType, TableSpec, TypeTag, UniqueConstraint};
    pub use crate::table::{build_table, TableBuilder};
}
