//! Workbook reader - .xlsx/.xls/.ods → grids of values and formulas

use crate::error::{TwraError, TwraResult};
use crate::source::SheetSource;
use crate::types::{Cell, Grid};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Spreadsheet file opened for reading raid sheets
pub struct WorkbookReader {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookReader {
    /// Open a workbook; the format is picked from the file extension
    pub fn open<P: AsRef<Path>>(path: P) -> TwraResult<Self> {
        let path = path.as_ref().to_path_buf();
        let workbook = open_workbook_auto(&path).map_err(|e| {
            TwraError::Workbook(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self { path, workbook })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SheetSource for WorkbookReader {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> TwraResult<Grid> {
        if !self.has_sheet(name) {
            return Err(TwraError::SheetNotFound(name.to_string()));
        }

        let values = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| TwraError::Workbook(format!("Failed to read sheet {}: {}", name, e)))?;

        // Not every format exposes formulas; values alone still scan
        let formulas = self.workbook.worksheet_formula(name).ok();

        let grid = grid_from_ranges(&values, formulas.as_ref());
        debug!(
            "Read sheet {} from {}: {} rows x {} columns",
            name,
            self.path.display(),
            grid.height(),
            grid.width()
        );
        Ok(grid)
    }
}

/// Build an A1-anchored grid from calamine's value and formula ranges
pub(crate) fn grid_from_ranges(values: &Range<Data>, formulas: Option<&Range<String>>) -> Grid {
    let (mut height, mut width) = range_extent(values);
    if let Some(formulas) = formulas {
        let (h, w) = range_extent(formulas);
        height = height.max(h);
        width = width.max(w);
    }

    let mut value_rows = Vec::with_capacity(height as usize);
    let mut formula_rows = Vec::with_capacity(height as usize);

    for row in 0..height {
        let mut cells = Vec::with_capacity(width as usize);
        let mut row_formulas = Vec::with_capacity(width as usize);
        for col in 0..width {
            cells.push(
                values
                    .get_value((row, col))
                    .map(convert_cell)
                    .unwrap_or_default(),
            );
            row_formulas.push(
                formulas
                    .and_then(|f| f.get_value((row, col)))
                    .map(|f| normalize_formula(f))
                    .unwrap_or_default(),
            );
        }
        value_rows.push(cells);
        formula_rows.push(row_formulas);
    }

    Grid::new(value_rows).with_formulas(formula_rows)
}

/// One past the last used (row, column), measured from A1
fn range_extent<T: calamine::CellType>(range: &Range<T>) -> (u32, u32) {
    match range.end() {
        Some((row, col)) if !range.is_empty() => (row + 1, col + 1),
        _ => (0, 0),
    }
}

/// Calamine strips the leading `=`; put it back so formulas read like the sheet
fn normalize_formula(formula: &str) -> String {
    if formula.is_empty() || formula.starts_with('=') {
        formula.to_string()
    } else {
        format!("={}", formula)
    }
}

/// Map a calamine value onto a typed cell
pub(crate) fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Boolean(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}
