//! Schema representation types.
//!
//! A sheet is read as a sequence of [`RawRow`]s. Each row is validated into a
//! [`ColumnSpec`], and the columns of one sheet form a [`TableSpec`]. All of
//! these are plain values: built once, read by the emitter, then dropped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Character columns at or above this length are promoted to [`SqlType::Text`].
pub const TEXT_PROMOTION_LENGTH: u64 = 256;

/// Prefix of every synthesized composite unique constraint name.
pub const UNIQUE_CONSTRAINT_PREFIX: &str = "uniq_idx_";

/// Canonical type tags recognised in a type cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeTag {
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    Varchar,
    /// Date and time.
    Timestamp,
    /// Integer.
    Int,
    /// Floating point.
    Real,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Character large object.
    Clob,
    /// Binary large object.
    Blob,
}

impl TypeTag {
    /// Returns the tag as written in the type cell.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Timestamp => "TIMESTAMP",
            Self::Int => "INT",
            Self::Real => "REAL",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Clob => "CLOB",
            Self::Blob => "BLOB",
        }
    }

    /// Returns whether the type cell carries a length for this tag.
    #[must_use]
    pub const fn carries_length(self) -> bool {
        matches!(self, Self::Char | Self::Varchar)
    }
}

/// Column type handed to a dialect, after length promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Fixed-length character string.
    Char(u64),
    /// Variable-length character string.
    Varchar(u64),
    /// Date and time.
    Timestamp,
    /// Integer.
    Integer,
    /// Floating point.
    Real,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Unbounded text.
    Text,
    /// Binary large object.
    Blob,
}

impl SqlType {
    /// Resolves a classified tag and length into the emitted type.
    ///
    /// `CHAR`/`VARCHAR` of [`TEXT_PROMOTION_LENGTH`] or more become `Text`,
    /// and `CLOB` always maps to `Text`.
    #[must_use]
    pub const fn resolve(tag: TypeTag, length: u64) -> Self {
        match tag {
            TypeTag::Char | TypeTag::Varchar if length >= TEXT_PROMOTION_LENGTH => Self::Text,
            TypeTag::Char => Self::Char(length),
            TypeTag::Varchar => Self::Varchar(length),
            TypeTag::Timestamp => Self::Timestamp,
            TypeTag::Int => Self::Integer,
            TypeTag::Real => Self::Real,
            TypeTag::Date => Self::Date,
            TypeTag::Time => Self::Time,
            TypeTag::Clob => Self::Text,
            TypeTag::Blob => Self::Blob,
        }
    }
}

/// One spreadsheet row, keyed by header label.
///
/// Missing cells read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell and returns the row.
    #[must_use]
    pub fn with(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(header, value);
        self
    }

    /// Sets a cell.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(header.into(), value.into());
    }

    /// Returns the cell text under `header`, or `""` when absent.
    #[must_use]
    pub fn get(&self, header: &str) -> &str {
        self.cells.get(header).map_or("", String::as_str)
    }

    /// Returns whether every cell of the row is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(String::is_empty)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Validated definition of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Tag matched in the type cell.
    pub type_tag: TypeTag,
    /// Length from the type cell; zero unless the tag carries one.
    pub length: u64,
    /// Emitted type after promotion.
    pub sql_type: SqlType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Key marker `P`.
    pub primary_key: bool,
    /// Key marker `K`.
    pub unique_key_member: bool,
    /// Index marker `I`.
    pub indexed: bool,
}

impl ColumnSpec {
    /// Creates a nullable, unkeyed, unindexed column.
    #[must_use]
    pub fn new(name: impl Into<String>, type_tag: TypeTag, length: u64) -> Self {
        Self {
            name: name.into(),
            type_tag,
            length,
            sql_type: SqlType::resolve(type_tag, length),
            nullable: true,
            primary_key: false,
            unique_key_member: false,
            indexed: false,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as a member of the composite unique key.
    #[must_use]
    pub fn unique_key_member(mut self) -> Self {
        self.unique_key_member = true;
        self
    }

    /// Marks the column as indexed.
    #[must_use]
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Returns whether DDL should declare the column NOT NULL.
    #[must_use]
    pub const fn renders_not_null(&self) -> bool {
        !self.nullable || self.primary_key
    }
}

/// Composite unique constraint over the `K`-marked columns of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    /// Full, untruncated constraint name.
    pub name: String,
    /// Member columns in row order.
    pub columns: Vec<String>,
}

impl UniqueConstraint {
    /// Creates a constraint named `uniq_idx_` followed by the member names.
    #[must_use]
    pub fn over(columns: Vec<String>) -> Self {
        let name = format!("{UNIQUE_CONSTRAINT_PREFIX}{}", columns.join("_"));
        Self { name, columns }
    }

    /// Returns the name cut to at most `max` characters.
    #[must_use]
    pub fn name_within(&self, max: usize) -> &str {
        truncate_chars(&self.name, max)
    }
}

/// Validated definition of one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name (the sheet name).
    pub name: String,
    /// Columns in row order.
    pub columns: Vec<ColumnSpec>,
    /// Composite unique key, present when two or more columns are `K`.
    pub unique_key: Option<UniqueConstraint>,
}

impl TableSpec {
    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the primary key column names in row order.
    pub fn primary_key(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    /// Returns the indexed column names in row order.
    pub fn indexed_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.indexed)
            .map(|c| c.name.as_str())
    }
}

/// Cuts `s` to at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(end, _)| &s[..end])
}
