//! Native type spellings per dialect.

/// Column type names of one dialect.
///
/// `char` and `varchar` are prefixes that receive a `(n)` length suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeNames {
    /// Fixed-length character type.
    pub char: &'static str,
    /// Variable-length character type.
    pub varchar: &'static str,
    /// Date and time of day.
    pub timestamp: &'static str,
    /// Integer type.
    pub integer: &'static str,
    /// Floating-point type.
    pub real: &'static str,
    /// Calendar date.
    pub date: &'static str,
    /// Time of day.
    pub time: &'static str,
    /// Unbounded text, also used for promoted long strings.
    pub text: &'static str,
    /// Binary large object.
    pub blob: &'static str,
}

pub const SQLITE: TypeNames = TypeNames {
    char: "CHAR",
    varchar: "VARCHAR",
    timestamp: "TIMESTAMP",
    integer: "INTEGER",
    real: "REAL",
    date: "DATE",
    time: "TIME",
    text: "TEXT",
    blob: "BLOB",
};

pub const MYSQL: TypeNames = TypeNames {
    timestamp: "DATETIME",
    real: "FLOAT",
    text: "LONGTEXT",
    blob: "LONGBLOB",
    ..SQLITE
};

pub const POSTGRESQL: TypeNames = TypeNames {
    timestamp: "TIMESTAMP WITHOUT TIME ZONE",
    time: "TIME WITHOUT TIME ZONE",
    blob: "BYTEA",
    ..SQLITE
};

// Oracle has no TIME type.
pub const ORACLE: TypeNames = TypeNames {
    varchar: "VARCHAR2",
    real: "BINARY_FLOAT",
    time: "TIMESTAMP",
    text: "CLOB",
    ..SQLITE
};

pub const MSSQL: TypeNames = TypeNames {
    timestamp: "DATETIME2",
    text: "VARCHAR(max)",
    blob: "VARBINARY(max)",
    ..SQLITE
};

pub const DB2: TypeNames = TypeNames {
    text: "CLOB",
    ..SQLITE
};
