//! sheetddl CLI
//!
//! Command-line tool for generating DDL from a spreadsheet schema.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sheetddl::prelude::*;

/// Generate CREATE TABLE scripts for several databases from a workbook.
#[derive(Parser)]
#[command(name = "sheetddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workbook holding the schema sheets.
    #[arg(env = "SHEETDDL_SPEC_FILE")]
    workbook: PathBuf,

    /// JSON config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the <dialect>.sql files.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only sheets whose names contain this text are read.
    #[arg(short = 'p', long)]
    sheet_pattern: Option<String>,

    /// Target dialect (repeatable).
    #[arg(short, long = "dialect", value_name = "DIALECT")]
    dialects: Vec<Dialect>,

    /// Print the DDL instead of writing files.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = Config::new(self.workbook);
        if let Some(path) = &self.config {
            config = config.merge(ConfigFile::load(path)?)?;
        }
        if let Some(dir) = self.output_dir {
            config = config.output_dir(dir);
        }
        if let Some(pattern) = self.sheet_pattern {
            config = config.sheet_pattern(pattern);
        }
        if !self.dialects.is_empty() {
            config = config.dialects(self.dialects);
        }
        Ok(config.dry_run(self.dry_run))
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    let mut workbook = CalamineWorkbook::open(&config.spec_file)?;
    let driver = Driver::new(&config);

    if config.dry_run {
        info!("Dry run mode - DDL will be printed but not written.");
        driver.run(&mut workbook, &mut StdoutOutput)?;
    } else {
        driver.run(&mut workbook, &mut FsOutput)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(cli).inspect_err(report)?;
    Ok(())
}
