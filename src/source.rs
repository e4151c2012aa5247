//! Where grids come from: workbooks on disk or sheets held in memory

use crate::error::{TwraError, TwraResult};
use crate::types::{Grid, RangeRef};

/// A collection of named sheets that can be read as grids
pub trait SheetSource {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Full data range of a sheet, anchored at A1
    fn read_sheet(&mut self, name: &str) -> TwraResult<Grid>;

    /// Sheet used when no explicit sheet or range is given
    fn active_sheet(&self) -> Option<String> {
        self.sheet_names().into_iter().next()
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|s| s == name)
    }

    /// Read the cells covered by an A1 reference
    fn read_range(&mut self, range: &RangeRef) -> TwraResult<Grid> {
        let sheet = match &range.sheet {
            Some(sheet) => sheet.clone(),
            None => self.active_sheet().ok_or(TwraError::NoActiveSheet)?,
        };
        let grid = self.read_sheet(&sheet)?;
        Ok(grid.window(range.rows(), range.cols()))
    }
}

/// In-memory sheets, in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sheets: Vec<(String, Grid)>,
    active: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a sheet
    pub fn with_sheet(mut self, name: impl Into<String>, grid: Grid) -> Self {
        self.insert(name, grid);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, grid: Grid) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = grid,
            None => self.sheets.push((name, grid)),
        }
    }

    /// Override the active sheet (defaults to the first one)
    pub fn set_active(&mut self, name: impl Into<String>) {
        self.active = Some(name.into());
    }
}

impl SheetSource for MemorySource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> TwraResult<Grid> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| TwraError::SheetNotFound(name.to_string()))
    }

    fn active_sheet(&self) -> Option<String> {
        self.active
            .clone()
            .filter(|name| self.has_sheet(name))
            .or_else(|| self.sheet_names().into_iter().next())
    }
}
