//! Run orchestration.
//!
//! The driver reads every selected sheet, renders every configured dialect in
//! memory, and only then hands the scripts to an [`OutputSink`]. A failure at
//! any point leaves the sink untouched.

use std::path::PathBuf;

use tracing::{debug, error, info};

use sheetddl_core::dialect::Dialect;
use sheetddl_core::schema::TableSpec;
use sheetddl_core::table::build_table;

use crate::config::Config;
use crate::error::{DriverError, Result};
use crate::output::OutputSink;
use crate::workbook::WorkbookSource;

/// DDL rendered for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript {
    /// Target dialect.
    pub dialect: Dialect,
    /// File the script belongs in.
    pub path: PathBuf,
    /// Script text.
    pub text: String,
}

/// Runs the sheet to DDL pipeline for one [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct Driver<'a> {
    config: &'a Config,
}

impl<'a> Driver<'a> {
    /// Creates a driver.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Returns the names containing the sheet pattern, in workbook order.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::NoMatchingSheets`] if none match.
    pub fn select_sheets(&self, names: &[String]) -> Result<Vec<String>> {
        let pattern = &self.config.sheet_pattern;
        let selected: Vec<String> = names
            .iter()
            .filter(|name| name.contains(pattern.as_str()))
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(DriverError::NoMatchingSheets {
                pattern: pattern.clone(),
            });
        }
        debug!(sheets = ?selected, "selected sheets");
        Ok(selected)
    }

    /// Reads and validates every selected sheet.
    ///
    /// # Errors
    ///
    /// Returns the first workbook, header or row error.
    pub fn load_tables(&self, source: &mut dyn WorkbookSource) -> Result<Vec<TableSpec>> {
        let names = source.sheet_names()?;
        let mut tables = Vec::new();
        for sheet in self.select_sheets(&names)? {
            let sheet_rows = source.read_rows(&sheet)?;
            sheet_rows.require_headers(&sheet, &self.config.headers)?;
            tables.push(build_table(&sheet, &sheet_rows.rows, &self.config.headers)?);
        }
        Ok(tables)
    }

    /// Renders the tables for every configured dialect.
    ///
    /// # Errors
    ///
    /// Returns the first emission error.
    pub fn render(&self, tables: &[TableSpec]) -> Result<Vec<RenderedScript>> {
        self.config
            .descriptors()
            .into_iter()
            .map(|descriptor| {
                let text = descriptor.render_tables(tables)?;
                let dialect = descriptor.dialect();
                Ok(RenderedScript {
                    dialect,
                    path: self.config.output_path(dialect),
                    text,
                })
            })
            .collect()
    }

    /// Reads, renders and writes everything.
    ///
    /// Nothing reaches `sink` unless every sheet renders for every dialect.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub fn run(
        &self,
        source: &mut dyn WorkbookSource,
        sink: &mut dyn OutputSink,
    ) -> Result<Vec<RenderedScript>> {
        let tables = self.load_tables(source)?;
        let scripts = self.render(&tables)?;
        for script in &scripts {
            sink.write(&script.path, &script.text)?;
            info!(
                dialect = %script.dialect,
                tables = tables.len(),
                "Generated {}",
                script.path.display()
            );
        }
        Ok(scripts)
    }
}

/// Logs a fatal error, with the offending row when there is one.
pub fn report(err: &DriverError) {
    match err.row_context() {
        Some((sheet, column, value)) => error!(sheet, column, value, "{err}"),
        None => error!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use sheetddl_core::SchemaError;

    use crate::output::MemoryOutput;
    use crate::workbook::MemoryWorkbook;

    const HEADER: [&str; 6] = ["型", "NULL", "項目（英語）", "項目の内容", "KEY", "INDEX"];

    fn workbook() -> MemoryWorkbook {
        MemoryWorkbook::new()
            .sheet("README", [["anything"]])
            .sheet(
                "SDM_USER",
                [
                    HEADER,
                    ["INT", "", "id", "identifier", "P", ""],
                    ["VARCHAR(40)", "NOT NULL", "email", "login", "", "I"],
                ],
            )
            .sheet(
                "SDM_ROLE",
                [
                    HEADER,
                    ["CHAR(4)", "", "x", "", "K", ""],
                    ["CHAR(4)", "", "y", "", "K", ""],
                ],
            )
    }

    #[test]
    fn test_select_sheets() {
        let config = Config::new("w.xlsx");
        let driver = Driver::new(&config);
        let names: Vec<String> = ["SDM_B", "notes", "OLD_SDM_A", "sdm_c"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(driver.select_sheets(&names).unwrap(), vec!["SDM_B", "OLD_SDM_A"]);

        let err = driver.select_sheets(&names[1..2]).unwrap_err();
        assert!(matches!(err, DriverError::NoMatchingSheets { ref pattern } if pattern == "SDM_"));
    }

    #[test]
    fn test_load_tables_in_sheet_order() {
        let config = Config::new("w.xlsx");
        let tables = Driver::new(&config).load_tables(&mut workbook()).unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["SDM_USER", "SDM_ROLE"]);
        assert!(tables[1].unique_key.is_some());
    }

    #[test]
    fn test_run_writes_one_script_per_dialect() {
        let config = Config::new("w.xlsx").output_dir("out");
        let mut sink = MemoryOutput::new();
        let scripts = Driver::new(&config).run(&mut workbook(), &mut sink).unwrap();

        let paths: Vec<&Path> = sink.files.iter().map(|(p, _)| p.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("out/sqlite.sql"),
                Path::new("out/mysql.sql"),
                Path::new("out/postgresql.sql"),
                Path::new("out/oracle.sql"),
                Path::new("out/mssql.sql"),
            ]
        );
        assert_eq!(scripts.len(), 5);

        let sqlite = sink.get(Path::new("out/sqlite.sql")).unwrap();
        assert!(sqlite.starts_with("CREATE TABLE \"SDM_USER\" (\n"));
        assert!(sqlite.contains(
            ");\nCREATE INDEX \"ix_SDM_USER_email\" ON \"SDM_USER\" (\"email\");\n\nCREATE TABLE \"SDM_ROLE\""
        ));
        assert!(sqlite.contains("CONSTRAINT \"uniq_idx_x_y\" UNIQUE (\"x\", \"y\")"));
        assert!(sqlite.ends_with(");\n"));
        assert!(!sqlite.contains("identifier"));
    }

    #[test]
    fn test_row_error_writes_nothing() {
        let mut source = workbook().sheet(
            "SDM_BAD",
            [HEADER, ["NUMBER(5)", "", "qty", "", "", ""]],
        );
        let config = Config::new("w.xlsx");
        let mut sink = MemoryOutput::new();
        let err = Driver::new(&config).run(&mut source, &mut sink).unwrap_err();
        assert_eq!(err.row_context(), Some(("SDM_BAD", "qty", "NUMBER(5)")));
        assert!(sink.files.is_empty());
    }

    #[test]
    fn test_long_index_name_truncated_for_oracle_only() {
        let mut source = MemoryWorkbook::new().sheet(
            "SDM_CUSTOMER",
            [HEADER, ["DATE", "", "registration_date", "", "", "I"]],
        );
        let config = Config::new("w.xlsx");
        let mut sink = MemoryOutput::new();
        Driver::new(&config).run(&mut source, &mut sink).unwrap();
        assert_eq!(sink.files.len(), 5);

        let oracle = sink.get(&config.output_path(Dialect::Oracle)).unwrap();
        assert!(oracle.contains("CREATE INDEX \"ix_SDM_CUSTOMER_registration_d\" ON"));
        let sqlite = sink.get(&config.output_path(Dialect::Sqlite)).unwrap();
        assert!(sqlite.contains("CREATE INDEX \"ix_SDM_CUSTOMER_registration_date\" ON"));
    }

    #[test]
    fn test_emission_error_in_one_dialect_writes_nothing() {
        let mut source = MemoryWorkbook::new().sheet(
            "SDM_CUSTOMER",
            [
                HEADER,
                ["DATE", "", "registration_date", "", "", "I"],
                ["DATE", "", "registration_day", "", "", "I"],
            ],
        );
        let config = Config::new("w.xlsx");
        let mut sink = MemoryOutput::new();
        let err = Driver::new(&config).run(&mut source, &mut sink).unwrap_err();
        assert!(matches!(
            err,
            DriverError::Schema(SchemaError::DuplicateIdentifier { dialect: "oracle", max: 30, .. })
        ));
        assert!(sink.files.is_empty());

        let config = config.dialects([Dialect::Sqlite, Dialect::Mysql]);
        assert!(Driver::new(&config).run(&mut source, &mut sink).is_ok());
        assert_eq!(sink.files.len(), 2);
    }

    #[test]
    fn test_missing_header() {
        let mut source = MemoryWorkbook::new().sheet(
            "SDM_A",
            [["型", "NULL", "項目（英語）", "KEY"], ["INT", "", "id", "P"]],
        );
        let config = Config::new("w.xlsx");
        let err = Driver::new(&config).load_tables(&mut source).unwrap_err();
        assert!(matches!(err, DriverError::MissingHeader { ref header, .. } if header == "INDEX"));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let config = Config::new("w.xlsx");
        let driver = Driver::new(&config);
        let first = driver.run(&mut workbook(), &mut MemoryOutput::new()).unwrap();
        let second = driver.run(&mut workbook(), &mut MemoryOutput::new()).unwrap();
        assert_eq!(first, second);
    }
}
