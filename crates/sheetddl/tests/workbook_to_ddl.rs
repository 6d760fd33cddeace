//! End-to-end tests: real .xlsx workbooks through the driver and the CLI.

use std::path::{Path, PathBuf};
use std::process::Command;

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use sheetddl::prelude::*;

const HEADER: [&str; 6] = ["型", "NULL", "項目（英語）", "項目の内容", "KEY", "INDEX"];

/// A cell of a fixture sheet.
#[derive(Clone, Copy)]
enum Cell {
    Text(&'static str),
    Number(f64),
    Blank,
}

use Cell::{Blank, Number, Text};

fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (c, header) in HEADER.iter().enumerate() {
            worksheet
                .write_string(0, u16::try_from(c).unwrap(), *header)
                .unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            let r = u32::try_from(r + 1).unwrap();
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c).unwrap();
                match cell {
                    Text(s) => {
                        worksheet.write_string(r, c, *s).unwrap();
                    }
                    Number(n) => {
                        worksheet.write_number(r, c, *n).unwrap();
                    }
                    Blank => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn row(ty: &'static str, nullable: &'static str, name: &'static str, key: Cell, index: &'static str) -> Vec<Cell> {
    vec![Text(ty), Text(nullable), Text(name), Text("説明"), key, Text(index)]
}

fn fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("schema.xlsx");
    write_workbook(
        &path,
        &[
            ("表紙", vec![]),
            (
                "SDM_USER",
                vec![
                    row("INT", "", "id", Text("P"), ""),
                    row("VARCHAR(40)", "NOT NULL", "email", Blank, "I"),
                    row("VARCHAR(1000)", "\u{3000}", "profile", Number(0.0), "N"),
                    vec![Blank, Blank, Blank, Blank, Blank, Blank],
                ],
            ),
            (
                "SDM_ROLE",
                vec![
                    row("CHAR(4)", "NOT_NULL", "x", Text("K"), ""),
                    row("INT", "", "y", Text("K"), "M"),
                    row("TIMESTAMP", "", "granted_at", Text(" "), ""),
                ],
            ),
        ],
    );
    path
}

#[test]
fn test_xlsx_to_every_default_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(fixture(&dir)).output_dir(dir.path().join("sql"));

    let mut workbook = CalamineWorkbook::open(&config.spec_file).unwrap();
    Driver::new(&config).run(&mut workbook, &mut FsOutput).unwrap();

    for dialect in Dialect::DEFAULTS {
        let path = dir.path().join("sql").join(format!("{dialect}.sql"));
        assert!(path.exists(), "{}", path.display());
    }
    assert!(!dir.path().join("sql").join("db2.sql").exists());

    let sqlite = std::fs::read_to_string(dir.path().join("sql/sqlite.sql")).unwrap();
    assert_eq!(
        sqlite,
        "CREATE TABLE \"SDM_USER\" (\n\
         \x20   \"id\" INTEGER NOT NULL,\n\
         \x20   \"email\" VARCHAR(40) NOT NULL,\n\
         \x20   \"profile\" TEXT,\n\
         \x20   PRIMARY KEY (\"id\")\n\
         );\n\
         CREATE INDEX \"ix_SDM_USER_email\" ON \"SDM_USER\" (\"email\");\n\
         \n\
         CREATE TABLE \"SDM_ROLE\" (\n\
         \x20   \"x\" CHAR(4) NOT NULL,\n\
         \x20   \"y\" INTEGER,\n\
         \x20   \"granted_at\" TIMESTAMP,\n\
         \x20   CONSTRAINT \"uniq_idx_x_y\" UNIQUE (\"x\", \"y\")\n\
         );\n"
    );

    let mysql = std::fs::read_to_string(dir.path().join("sql/mysql.sql")).unwrap();
    assert!(mysql.contains("`profile` LONGTEXT,"));
    assert!(mysql.contains("`granted_at` DATETIME,"));

    let oracle = std::fs::read_to_string(dir.path().join("sql/oracle.sql")).unwrap();
    assert!(oracle.contains("\"email\" VARCHAR2(40) NOT NULL,"));
    assert!(oracle.contains("\"profile\" CLOB,"));

    let mssql = std::fs::read_to_string(dir.path().join("sql/mssql.sql")).unwrap();
    assert!(mssql.contains("CREATE INDEX [ix_SDM_USER_email] ON [SDM_USER] ([email]);"));
}

#[test]
fn test_rerun_overwrites_with_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(fixture(&dir)).output_dir(dir.path().join("sql"));
    let out = dir.path().join("sql/postgresql.sql");

    std::fs::create_dir_all(dir.path().join("sql")).unwrap();
    std::fs::write(&out, "stale content that is much longer than nothing").unwrap();

    let mut workbook = CalamineWorkbook::open(&config.spec_file).unwrap();
    Driver::new(&config).run(&mut workbook, &mut FsOutput).unwrap();
    let first = std::fs::read(&out).unwrap();

    let mut workbook = CalamineWorkbook::open(&config.spec_file).unwrap();
    Driver::new(&config).run(&mut workbook, &mut FsOutput).unwrap();
    let second = std::fs::read(&out).unwrap();

    assert_eq!(first, second);
    assert!(!String::from_utf8(first).unwrap().contains("stale"));
}

#[test]
fn test_invalid_marker_leaves_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.xlsx");
    write_workbook(
        &path,
        &[
            ("SDM_OK", vec![row("INT", "", "id", Text("P"), "")]),
            ("SDM_BAD", vec![row("INT", "", "code", Text("X"), "")]),
        ],
    );
    let config = Config::new(&path).output_dir(dir.path().join("sql"));

    let mut workbook = CalamineWorkbook::open(&path).unwrap();
    let err = Driver::new(&config)
        .run(&mut workbook, &mut FsOutput)
        .unwrap_err();

    assert_eq!(err.row_context(), Some(("SDM_BAD", "code", "X")));
    assert!(!dir.path().join("sql").exists());
}

#[test]
fn test_custom_sheet_pattern_and_dialects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.xlsx");
    write_workbook(
        &path,
        &[
            ("SDM_SKIPPED", vec![row("BOGUS", "", "id", Text("P"), "")]),
            ("TBL_ITEM", vec![row("REAL", "", "price", Blank, "")]),
        ],
    );
    let config = Config::new(&path)
        .output_dir(dir.path().join("ddl"))
        .sheet_pattern("TBL_")
        .dialects([Dialect::Db2, Dialect::Oracle]);

    let mut workbook = CalamineWorkbook::open(&path).unwrap();
    let scripts = Driver::new(&config)
        .run(&mut workbook, &mut FsOutput)
        .unwrap();

    assert_eq!(scripts.len(), 2);
    let oracle = std::fs::read_to_string(dir.path().join("ddl/oracle.sql")).unwrap();
    assert_eq!(
        oracle,
        "CREATE TABLE \"TBL_ITEM\" (\n    \"price\" BINARY_FLOAT\n);\n"
    );
    assert!(dir.path().join("ddl/db2.sql").exists());
    assert!(!dir.path().join("ddl/sqlite.sql").exists());
}

#[test]
fn test_cli_dry_run_prints_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = fixture(&dir);
    let out_dir = dir.path().join("sql");

    let output = Command::new(env!("CARGO_BIN_EXE_sheetddl"))
        .arg(&workbook)
        .arg("--dry-run")
        .args(["-d", "postgres", "-o"])
        .arg(&out_dir)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let banner = format!("-- {}\n", out_dir.join("postgresql.sql").display());
    assert!(stdout.starts_with(&banner), "{stdout}");
    assert!(stdout.contains("\"granted_at\" TIMESTAMP WITHOUT TIME ZONE,"));
    assert!(!out_dir.exists());
}

#[test]
fn test_cli_config_file_limit_truncates_generated_names() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = fixture(&dir);
    let config = dir.path().join("sheetddl.json");
    std::fs::write(
        &config,
        r#"{"dialects": ["oracle"], "identifier_limits": {"oracle": 11}}"#,
    )
    .unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_sheetddl"))
        .arg(&workbook)
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(dir.path().join("sql"))
        .status()
        .unwrap();

    assert!(status.success());
    let oracle = std::fs::read_to_string(dir.path().join("sql/oracle.sql")).unwrap();
    assert!(oracle.contains("CREATE INDEX \"ix_SDM_USER\" ON \"SDM_USER\" (\"email\");"));
    assert!(oracle.contains("CONSTRAINT \"uniq_idx_x_\" UNIQUE (\"x\", \"y\")"));
    assert!(!dir.path().join("sql/sqlite.sql").exists());
}

#[test]
fn test_cli_config_file_failure_status() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = fixture(&dir);
    let config = dir.path().join("sheetddl.json");
    std::fs::write(&config, r#"{"identifier_limits": {"access": 10}}"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_sheetddl"))
        .arg(&workbook)
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(dir.path().join("sql"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Unknown dialect 'access'"), "{stderr}");
    assert!(!dir.path().join("sql").exists());
}

#[test]
fn test_cli_reads_workbook_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = fixture(&dir);
    let out_dir = dir.path().join("out");

    let status = Command::new(env!("CARGO_BIN_EXE_sheetddl"))
        .env("SHEETDDL_SPEC_FILE", &workbook)
        .args(["-d", "sqlite", "-o"])
        .arg(&out_dir)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_dir.join("sqlite.sql").exists());
}

#[test]
fn test_cli_rejects_unknown_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let workbook = fixture(&dir);

    let output = Command::new(env!("CARGO_BIN_EXE_sheetddl"))
        .arg(&workbook)
        .args(["-d", "access"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("Unknown dialect 'access'"));
}
