//! DDL text generation.
//!
//! Rendering is a pure function of a [`TableSpec`] and a [`DialectDescriptor`]:
//! the same inputs always give the same bytes.

use std::collections::BTreeSet;

use tracing::debug;

use super::DialectDescriptor;
use crate::error::{Result, SchemaError};
use crate::schema::{ColumnSpec, TableSpec};

/// Indentation of the lines inside `CREATE TABLE ( ... )`.
const INDENT: &str = "    ";

/// Returns the index name for `column` of `table`, before truncation.
#[must_use]
pub fn index_name(table: &str, column: &str) -> String {
    format!("ix_{table}_{column}")
}

impl DialectDescriptor {
    /// Generates a column definition, e.g. `"id" INTEGER NOT NULL`.
    #[must_use]
    pub fn column_definition(&self, column: &ColumnSpec) -> String {
        let mut sql = self.quote_identifier(&column.name);
        sql.push(' ');
        sql.push_str(&self.type_name(&column.sql_type));
        if column.renders_not_null() {
            sql.push_str(" NOT NULL");
        }
        sql
    }

    /// Generates the `CREATE TABLE` statement, including the primary key and
    /// the composite unique constraint.
    ///
    /// Name collisions are not checked here; see [`Self::render_table`].
    #[must_use]
    pub fn create_table(&self, table: &TableSpec) -> String {
        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();

        let pk: Vec<String> = table
            .primary_key()
            .map(|c| self.quote_identifier(c))
            .collect();
        if !pk.is_empty() {
            lines.push(format!("PRIMARY KEY ({})", pk.join(", ")));
        }

        if let Some(uc) = &table.unique_key {
            let members: Vec<String> = uc
                .columns
                .iter()
                .map(|c| self.quote_identifier(c))
                .collect();
            lines.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                self.quote_identifier(uc.name_within(self.max_identifier_length)),
                members.join(", ")
            ));
        }

        let mut sql = String::from("CREATE TABLE ");
        sql.push_str(&self.quote_identifier(&table.name));
        sql.push_str(" (\n");
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                sql.push_str(",\n");
            }
            sql.push_str(INDENT);
            sql.push_str(line);
        }
        if !lines.is_empty() {
            sql.push('\n');
        }
        sql.push_str(");");
        sql
    }

    /// Generates a single-column `CREATE INDEX` statement. The index name is
    /// cut to the identifier length.
    #[must_use]
    pub fn create_index(&self, table: &str, column: &str) -> String {
        let name = index_name(table, column);
        format!(
            "CREATE INDEX {} ON {} ({});",
            self.quote_identifier(self.truncate_identifier(&name)),
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    /// Renders the full DDL of one table: `CREATE TABLE` followed by one
    /// `CREATE INDEX` per indexed column, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateIdentifier`] if two index names, or an
    /// index name and the constraint name, are equal after truncation.
    pub fn render_table(&self, table: &TableSpec) -> Result<String> {
        let mut names = BTreeSet::new();
        if let Some(uc) = &table.unique_key {
            names.insert(uc.name_within(self.max_identifier_length).to_string());
        }
        for column in table.indexed_columns() {
            let name = index_name(&table.name, column);
            let name = self.truncate_identifier(&name);
            if !names.insert(name.to_string()) {
                return Err(SchemaError::DuplicateIdentifier {
                    dialect: self.name(),
                    sheet: table.name.clone(),
                    identifier: name.to_string(),
                    max: self.max_identifier_length,
                });
            }
        }

        let mut sql = self.create_table(table);
        for column in table.indexed_columns() {
            sql.push('\n');
            sql.push_str(&self.create_index(&table.name, column));
        }

        debug!(dialect = self.name(), table = %table.name, "rendered table");
        Ok(sql)
    }

    /// Renders every table, in order, separated by a blank line.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`Self::render_table`].
    pub fn render_tables(&self, tables: &[TableSpec]) -> Result<String> {
        let rendered = tables
            .iter()
            .map(|t| self.render_table(t))
            .collect::<Result<Vec<_>>>()?;
        if rendered.is_empty() {
            return Ok(String::new());
        }
        let mut text = rendered.join("\n\n");
        text.push('\n');
        Ok(text)
    }
}
