//! Workbook access.
//!
//! The driver reads sheets through [`WorkbookSource`]. [`CalamineWorkbook`]
//! reads real files (xlsx, xlsm, xlsb, xls, ods); [`MemoryWorkbook`] holds
//! sheets built in code.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use tracing::debug;

use sheetddl_core::row::HeaderLabels;
use sheetddl_core::schema::RawRow;

use crate::error::{DriverError, Result};

/// A source of named sheets.
pub trait WorkbookSource {
    /// Returns the sheet names in workbook order.
    ///
    /// # Errors
    ///
    /// Returns an error if the workbook cannot be read.
    fn sheet_names(&mut self) -> Result<Vec<String>>;

    /// Reads one sheet. Its first row holds the headers.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::SheetNotFound`] for an unknown sheet, or the
    /// reader's error.
    fn read_rows(&mut self, sheet: &str) -> Result<SheetRows>;
}

/// The header row and data rows of one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRows {
    /// Header labels in column order.
    pub headers: Vec<String>,
    /// Data rows keyed by header label.
    pub rows: Vec<RawRow>,
}

impl SheetRows {
    /// Builds rows from a grid of cell text whose first row is the header.
    ///
    /// Columns with an empty header are dropped, and a repeated header keeps
    /// its first column. Short rows read their missing cells as empty.
    #[must_use]
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let mut grid = grid.into_iter();
        let Some(headers) = grid.next() else {
            return Self::default();
        };

        let mut columns: Vec<(usize, &str)> = Vec::new();
        for (i, header) in headers.iter().enumerate() {
            if !header.is_empty() && !columns.iter().any(|(_, h)| *h == header) {
                columns.push((i, header.as_str()));
            }
        }

        let rows = grid
            .map(|cells| {
                columns
                    .iter()
                    .map(|&(i, header)| (header, cells.get(i).cloned().unwrap_or_default()))
                    .collect::<RawRow>()
            })
            .collect();

        Self { headers, rows }
    }

    /// Checks that every required label is among the headers.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::MissingHeader`] naming the first absent label.
    pub fn require_headers(&self, sheet: &str, labels: &HeaderLabels) -> Result<()> {
        match labels
            .required()
            .into_iter()
            .find(|label| !self.headers.iter().any(|h| h == label))
        {
            Some(header) => Err(DriverError::MissingHeader {
                sheet: sheet.to_string(),
                header: header.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Workbook file read through calamine.
pub struct CalamineWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    /// Opens a workbook, detecting its format from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened as a workbook.
    pub fn open(path: &Path) -> Result<Self> {
        let sheets = open_workbook_auto(path)?;
        debug!(path = %path.display(), "opened workbook");
        Ok(Self { sheets })
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn sheet_names(&mut self) -> Result<Vec<String>> {
        Ok(self.sheets.sheet_names())
    }

    fn read_rows(&mut self, sheet: &str) -> Result<SheetRows> {
        if !self.sheets.sheet_names().iter().any(|name| name == sheet) {
            return Err(DriverError::SheetNotFound(sheet.to_string()));
        }
        let range = self.sheets.worksheet_range(sheet)?;
        let grid = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        Ok(SheetRows::from_grid(grid))
    }
}

/// Sheets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl MemoryWorkbook {
    /// Creates an empty workbook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sheet given as rows of cell text, header row first.
    #[must_use]
    pub fn sheet<R, C>(mut self, name: impl Into<String>, grid: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let grid = grid
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.sheets.push((name.into(), grid));
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&mut self) -> Result<Vec<String>> {
        Ok(self.sheets.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_rows(&mut self, sheet: &str) -> Result<SheetRows> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, grid)| SheetRows::from_grid(grid.clone()))
            .ok_or_else(|| DriverError::SheetNotFound(sheet.to_string()))
    }
}

/// Normalizes a cell to the text the row validator sees.
#[must_use]
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => number_text(*f),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => number_text(dt.as_f64()),
    }
}

// Integral floats print without a decimal point, so a numeric 0 marker
// reads as "0". Negative zero reads as "0" too.
fn number_text(f: f64) -> String {
    if f == 0.0 {
        "0".to_string()
    } else if f.is_finite() && f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}
