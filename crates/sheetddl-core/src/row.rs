//! Row validation.
//!
//! Turns one loosely-typed sheet row into a [`ColumnSpec`], enforcing the
//! controlled vocabularies of the key, index and nullability cells. Markers
//! are matched exactly and case-sensitively.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::{Result, SchemaError};
use crate::schema::{ColumnSpec, RawRow};

/// Accepted key marker cells.
pub const KEY_MARKERS: &[&str] = &["P", "N", "0", "K", "", " "];

/// Accepted index marker cells.
pub const INDEX_MARKERS: &[&str] = &["I", "N", "M", "", " "];

/// Nullability cells meaning NOT NULL.
pub const NOT_NULL_MARKERS: &[&str] = &["NOT_NULL", "NOT NULL"];

/// Nullability cells meaning nullable: empty or an ideographic space.
pub const NULLABLE_MARKERS: &[&str] = &["", "\u{3000}"];

/// Name given to rows whose name cell is empty.
pub const MISSING_NAME: &str = "NA";

/// Header labels locating the cells of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
    /// Column name header.
    pub name: String,
    /// Type header.
    #[serde(rename = "type")]
    pub type_: String,
    /// Nullability header.
    pub nullable: String,
    /// Key marker header.
    pub key: String,
    /// Index marker header.
    pub index: String,
}

impl Default for HeaderLabels {
    fn default() -> Self {
        Self {
            name: "項目（英語）".to_string(),
            type_: "型".to_string(),
            nullable: "NULL".to_string(),
            key: "KEY".to_string(),
            index: "INDEX".to_string(),
        }
    }
}

impl HeaderLabels {
    /// Returns every label a sheet must carry.
    #[must_use]
    pub fn required(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.type_.as_str(),
            self.nullable.as_str(),
            self.key.as_str(),
            self.index.as_str(),
        ]
    }
}

/// Meaning of a key marker cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMarker {
    /// `P`: primary key column.
    Primary,
    /// `K`: member of the composite unique key.
    UniqueMember,
    /// `N`, `0`, blank: no key.
    None,
}

impl KeyMarker {
    /// Parses a key marker cell, or `None` if it is not in [`KEY_MARKERS`].
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "P" => Some(Self::Primary),
            "K" => Some(Self::UniqueMember),
            _ if KEY_MARKERS.contains(&value) => Some(Self::None),
            _ => None,
        }
    }
}

/// Meaning of an index marker cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMarker {
    /// `I`: ordinary index.
    Index,
    /// `M`: multi-dimensional cluster index. Accepted, emitted as no index.
    Cluster,
    /// `N`, blank: no index.
    None,
}

impl IndexMarker {
    /// Parses an index marker cell, or `None` if it is not in [`INDEX_MARKERS`].
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "I" => Some(Self::Index),
            "M" => Some(Self::Cluster),
            _ if INDEX_MARKERS.contains(&value) => Some(Self::None),
            _ => None,
        }
    }
}

/// Parses a nullability cell into `nullable`, or `None` if unrecognised.
#[must_use]
pub fn parse_nullable(value: &str) -> Option<bool> {
    if NOT_NULL_MARKERS.contains(&value) {
        Some(false)
    } else if NULLABLE_MARKERS.contains(&value) {
        Some(true)
    } else {
        None
    }
}

/// Validates the rows of one sheet.
#[derive(Debug, Clone, Copy)]
pub struct RowValidator<'a> {
    sheet: &'a str,
    headers: &'a HeaderLabels,
}

impl<'a> RowValidator<'a> {
    /// Creates a validator for `sheet`, reading cells under `headers`.
    #[must_use]
    pub const fn new(sheet: &'a str, headers: &'a HeaderLabels) -> Self {
        Self { sheet, headers }
    }

    /// Validates one row.
    ///
    /// The type cell is resolved first; the key, index and nullability cells
    /// follow. Descriptive cells are never read.
    ///
    /// # Errors
    ///
    /// Returns the first vocabulary violation found in the row.
    pub fn validate(&self, row: &RawRow) -> Result<ColumnSpec> {
        let name = match row.get(&self.headers.name) {
            "" => MISSING_NAME,
            name => name,
        };

        let (type_tag, length) = classify(self.sheet, name, row.get(&self.headers.type_))?;
        let mut column = ColumnSpec::new(name, type_tag, length);

        let key = row.get(&self.headers.key);
        match KeyMarker::parse(key).ok_or_else(|| self.error(MarkerKind::Key, name, key))? {
            KeyMarker::Primary => column.primary_key = true,
            KeyMarker::UniqueMember => column.unique_key_member = true,
            KeyMarker::None => {}
        }

        let index = row.get(&self.headers.index);
        match IndexMarker::parse(index)
            .ok_or_else(|| self.error(MarkerKind::Index, name, index))?
        {
            IndexMarker::Index => column.indexed = true,
            IndexMarker::Cluster => {
                warn!(sheet = self.sheet, column = name, "cluster index marker 'M' is not emitted");
            }
            IndexMarker::None => {}
        }

        let nullable = row.get(&self.headers.nullable);
        column.nullable = parse_nullable(nullable)
            .ok_or_else(|| self.error(MarkerKind::Nullability, name, nullable))?;

        debug!(
            sheet = self.sheet,
            column = name,
            sql_type = ?column.sql_type,
            nullable = column.nullable,
            primary_key = column.primary_key,
            unique_key_member = column.unique_key_member,
            indexed = column.indexed,
            "validated row"
        );
        Ok(column)
    }

    fn error(&self, kind: MarkerKind, column: &str, value: &str) -> SchemaError {
        let (sheet, column, value) = (
            self.sheet.to_string(),
            column.to_string(),
            value.to_string(),
        );
        match kind {
            MarkerKind::Key => SchemaError::InvalidKeyMarker {
                sheet,
                column,
                value,
            },
            MarkerKind::Index => SchemaError::InvalidIndexMarker {
                sheet,
                column,
                value,
            },
            MarkerKind::Nullability => SchemaError::InvalidNullabilityMarker {
                sheet,
                column,
                value,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MarkerKind {
    Key,
    Index,
    Nullability,
}
