//! Target database dialects.
//!
//! Dialects are data, not code: each one is a [`DialectDescriptor`] holding an
//! identifier length limit, a quoting style and a [`TypeNames`] table. A single
//! emitter (see [`emit`]) renders DDL for all of them, so supporting another
//! database means adding one descriptor.

mod catalog;
pub mod emit;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use catalog::TypeNames;

use crate::error::{Result, SchemaError};
use crate::schema::{truncate_chars, SqlType};

/// Supported target databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// SQLite.
    Sqlite,
    /// MySQL.
    Mysql,
    /// PostgreSQL.
    #[serde(alias = "postgres")]
    Postgresql,
    /// Oracle.
    Oracle,
    /// Microsoft SQL Server.
    #[serde(alias = "sqlserver")]
    Mssql,
    /// IBM DB2.
    Db2,
}

impl Dialect {
    /// Dialects rendered when none are configured. DB2 is opt-in.
    pub const DEFAULTS: [Self; 5] = [
        Self::Sqlite,
        Self::Mysql,
        Self::Postgresql,
        Self::Oracle,
        Self::Mssql,
    ];

    /// Every known dialect.
    pub const ALL: [Self; 6] = [
        Self::Sqlite,
        Self::Mysql,
        Self::Postgresql,
        Self::Oracle,
        Self::Mssql,
        Self::Db2,
    ];

    /// Returns the canonical name, also used as the output file stem.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Mysql => "mysql",
            Self::Postgresql => "postgresql",
            Self::Oracle => "oracle",
            Self::Mssql => "mssql",
            Self::Db2 => "db2",
        }
    }

    /// Returns the built-in descriptor.
    #[must_use]
    pub const fn descriptor(self) -> DialectDescriptor {
        match self {
            Self::Sqlite => DialectDescriptor::new(self, 64, ('"', '"'), &catalog::SQLITE),
            Self::Mysql => DialectDescriptor::new(self, 64, ('`', '`'), &catalog::MYSQL),
            Self::Postgresql => {
                DialectDescriptor::new(self, 63, ('"', '"'), &catalog::POSTGRESQL)
            }
            Self::Oracle => DialectDescriptor::new(self, 30, ('"', '"'), &catalog::ORACLE),
            Self::Mssql => DialectDescriptor::new(self, 64, ('[', ']'), &catalog::MSSQL),
            Self::Db2 => DialectDescriptor::new(self, 64, ('"', '"'), &catalog::DB2),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::Mysql),
            "postgresql" | "postgres" => Ok(Self::Postgresql),
            "oracle" => Ok(Self::Oracle),
            "mssql" | "sqlserver" => Ok(Self::Mssql),
            "db2" => Ok(Self::Db2),
            _ => Err(SchemaError::UnknownDialect(s.to_string())),
        }
    }
}

/// Rules for rendering DDL in one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectDescriptor {
    dialect: Dialect,
    max_identifier_length: usize,
    quote: (char, char),
    types: &'static TypeNames,
}

impl DialectDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(
        dialect: Dialect,
        max_identifier_length: usize,
        quote: (char, char),
        types: &'static TypeNames,
    ) -> Self {
        Self {
            dialect,
            max_identifier_length,
            quote,
            types,
        }
    }

    /// Returns a copy with a different identifier length limit.
    #[must_use]
    pub const fn with_max_identifier_length(mut self, max: usize) -> Self {
        self.max_identifier_length = max;
        self
    }

    /// Returns the dialect this descriptor renders.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the dialect name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Returns the maximum identifier length, in characters.
    #[must_use]
    pub const fn max_identifier_length(&self) -> usize {
        self.max_identifier_length
    }

    /// Returns the concrete column type for `sql_type`.
    #[must_use]
    pub fn type_name(&self, sql_type: &SqlType) -> String {
        let types = self.types;
        match sql_type {
            SqlType::Char(n) => format!("{}({n})", types.char),
            SqlType::Varchar(n) => format!("{}({n})", types.varchar),
            SqlType::Timestamp => types.timestamp.to_string(),
            SqlType::Integer => types.integer.to_string(),
            SqlType::Real => types.real.to_string(),
            SqlType::Date => types.date.to_string(),
            SqlType::Time => types.time.to_string(),
            SqlType::Text => types.text.to_string(),
            SqlType::Blob => types.blob.to_string(),
        }
    }

    /// Quotes an identifier, doubling any closing quote inside it.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.quote;
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(open);
        for c in name.chars() {
            quoted.push(c);
            if c == close {
                quoted.push(close);
            }
        }
        quoted.push(close);
        quoted
    }

    /// Cuts a generated name to the identifier length, in characters.
    #[must_use]
    pub fn truncate_identifier<'n>(&self, name: &'n str) -> &'n str {
        truncate_chars(name, self.max_identifier_length)
    }
}
