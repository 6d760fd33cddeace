//! Table assembly.
//!
//! Collects the validated columns of one sheet, in row order, and derives the
//! composite unique constraint from the `K`-marked columns.

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::row::{HeaderLabels, RowValidator};
use crate::schema::{ColumnSpec, RawRow, TableSpec, UniqueConstraint};

/// Builds a [`TableSpec`] one column at a time.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    columns: Vec<ColumnSpec>,
}

impl TableBuilder {
    /// Creates a builder for the table named after `sheet`.
    #[must_use]
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            name: sheet.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column after those already added.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateColumn`] if a column of the same name
    /// was already added.
    pub fn push(&mut self, column: ColumnSpec) -> Result<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(SchemaError::DuplicateColumn {
                sheet: self.name.clone(),
                column: column.name,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Finishes the table.
    ///
    /// A unique constraint is synthesized only when two or more columns are
    /// key members; a lone `K` column forms no constraint.
    #[must_use]
    pub fn build(self) -> TableSpec {
        let members: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.unique_key_member)
            .map(|c| c.name.clone())
            .collect();

        let unique_key = if members.len() >= 2 {
            Some(UniqueConstraint::over(members))
        } else {
            None
        };

        debug!(
            table = %self.name,
            columns = self.columns.len(),
            unique_key = unique_key.as_ref().map(|uc| uc.name.as_str()),
            "built table"
        );

        TableSpec {
            name: self.name,
            columns: self.columns,
            unique_key,
        }
    }
}

/// Validates every row of a sheet and assembles the table.
///
/// Rows are processed in order and blank rows are skipped; the first invalid
/// row aborts the sheet.
///
/// # Errors
///
/// Returns the first row validation or duplicate column error.
pub fn build_table<'r>(
    sheet: &str,
    rows: impl IntoIterator<Item = &'r RawRow>,
    headers: &HeaderLabels,
) -> Result<TableSpec> {
    let validator = RowValidator::new(sheet, headers);
    let mut builder = TableBuilder::new(sheet);
    for row in rows.into_iter().filter(|row| !row.is_blank()) {
        builder.push(validator.validate(row)?)?;
    }
    Ok(builder.build())
}
