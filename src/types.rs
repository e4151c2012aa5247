use crate::error::{TwraError, TwraResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

//==============================================================================
// Cells
//==============================================================================

/// A single spreadsheet value, typed once when the grid is ingested
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Exactly the empty string (blank cells and `""` text both land here)
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Boolean(bool),
    /// Spreadsheet error value such as `#N/A` or `#REF!`
    Error(String),
}

impl Cell {
    /// Build a text cell, normalizing `""` to `Empty`. Whitespace is kept as text.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text content, if this is a non-empty text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Coerce to the string written into an import row.
    ///
    /// Returns `None` for error values, which have no meaningful string form.
    pub fn coerce_text(&self) -> Option<String> {
        match self {
            Cell::Empty => Some(String::new()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Boolean(b) => Some(b.to_string()),
            Cell::Error(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{}", format_number(*n)),
            Cell::Boolean(b) => write!(f, "{b}"),
            Cell::Error(code) => write!(f, "{code}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Boolean(value)
    }
}

/// Format a number the way a spreadsheet shows it: integers without a decimal point
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

//==============================================================================
// Grid
//==============================================================================

static EMPTY_CELL: Cell = Cell::Empty;

/// Rectangular snapshot of cell values with a parallel grid of raw formula text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    values: Vec<Vec<Cell>>,
    formulas: Vec<Vec<String>>,
}

impl Grid {
    /// Create a grid with no formulas
    pub fn new(values: Vec<Vec<Cell>>) -> Self {
        Self {
            values,
            formulas: Vec::new(),
        }
    }

    /// Build a grid from anything convertible into cells
    pub fn from_rows<I, R, C>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Attach formula text. Missing rows/columns read as "no formula".
    pub fn with_formulas(mut self, formulas: Vec<Vec<String>>) -> Self {
        self.formulas = formulas;
        self
    }

    pub fn height(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Widest row in the grid
    pub fn width(&self) -> usize {
        self.values.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row_width(&self, row: usize) -> usize {
        self.values.get(row).map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn formula(&self, row: usize, col: usize) -> &str {
        self.formulas
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    /// True when every cell of the row is empty
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.is_span_empty(row, 0..self.row_width(row))
    }

    /// True when every cell in `cols` of the row is empty
    pub fn is_span_empty(&self, row: usize, cols: Range<usize>) -> bool {
        cols.into_iter().all(|col| self.cell(row, col).is_empty())
    }

    /// A section starts where column A is empty and column B holds text
    pub fn is_section_start(&self, row: usize) -> bool {
        self.cell(row, 0).is_empty() && self.cell(row, 1).as_text().is_some()
    }

    /// Copy out a rectangular window (values and formulas), clipped to the grid
    pub fn window(&self, rows: Range<usize>, cols: Range<usize>) -> Grid {
        let rows = clip(rows, self.height());
        let cols = clip(cols, self.width());
        let values = rows
            .clone()
            .map(|r| cols.clone().map(|c| self.cell(r, c).clone()).collect())
            .collect();
        let formulas = rows
            .map(|r| cols.clone().map(|c| self.formula(r, c).to_string()).collect())
            .collect();
        Grid { values, formulas }
    }
}

/// Intersect `range` with `0..limit`
fn clip(range: Range<usize>, limit: usize) -> Range<usize> {
    let end = range.end.min(limit);
    range.start.min(end)..end
}

//==============================================================================
// Sections
//==============================================================================

/// Sparse data row keyed by 1-based output column; never stores empty values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: BTreeMap<usize, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; empty strings are dropped. Returns whether it was stored.
    pub fn insert(&mut self, column: usize, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.columns.insert(column, value);
        true
    }

    pub fn get(&self, column: usize) -> Option<&str> {
        self.columns.get(&column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Columns in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns.iter().map(|(col, v)| (*col, v.as_str()))
    }

    pub fn max_column(&self) -> Option<usize> {
        self.columns.keys().next_back().copied()
    }
}

/// A named block of raid assignments
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    /// Always starts with "Icon"
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Section {
    /// Number of columns data rows may use (icon column included)
    pub fn width(&self) -> usize {
        self.header.len()
    }
}

//==============================================================================
// Options
//==============================================================================

/// How the scanner treats runs of fully-empty rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationMode {
    /// Explicit range: empty rows are skipped one by one
    RangeScoped,
    /// Whole sheet: two consecutive empty rows end the sheet
    MultiSheetScoped,
}

/// Output format switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// `sn`/`sh`/`sr` instead of `Section Name`/`Section Header`/`Section Rows`
    pub prefer_short_keys: bool,
    /// Run headers, icons and cell values through the abbreviation table
    pub use_abbreviations: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            prefer_short_keys: false,
            use_abbreviations: true,
        }
    }
}

impl ExportOptions {
    /// Smallest output: short keys and abbreviations
    pub fn compact() -> Self {
        Self {
            prefer_short_keys: true,
            use_abbreviations: true,
        }
    }

    /// Largest output: long keys, no abbreviations
    pub fn expanded() -> Self {
        Self {
            prefer_short_keys: false,
            use_abbreviations: false,
        }
    }

    pub fn field_keys(&self) -> FieldKeys {
        if self.prefer_short_keys {
            FieldKeys::SHORT
        } else {
            FieldKeys::LONG
        }
    }
}

/// Field names used inside each serialized section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKeys {
    pub name: &'static str,
    pub header: &'static str,
    pub rows: &'static str,
}

impl FieldKeys {
    pub const SHORT: FieldKeys = FieldKeys {
        name: "sn",
        header: "sh",
        rows: "sr",
    };

    pub const LONG: FieldKeys = FieldKeys {
        name: "Section Name",
        header: "Section Header",
        rows: "Section Rows",
    };
}

//==============================================================================
// A1 range references
//==============================================================================

lazy_static! {
    static ref A1_RANGE: Regex = Regex::new(
        r"^(?:(?:'((?:[^']|'')+)'|([^'!:]+))!)?\$?([A-Za-z]{1,3})\$?([0-9]+)(?::\$?([A-Za-z]{1,3})\$?([0-9]+))?$"
    )
    .unwrap();
}

/// Parsed `Sheet!A1:D20` reference (zero-based, inclusive corners)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRef {
    /// `None` means the active sheet
    pub sheet: Option<String>,
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl RangeRef {
    pub fn parse(reference: &str) -> TwraResult<Self> {
        let trimmed = reference.trim();
        let caps = A1_RANGE
            .captures(trimmed)
            .ok_or_else(|| TwraError::InvalidRange(reference.to_string()))?;

        let sheet = caps
            .get(1)
            .map(|m| m.as_str().replace("''", "'"))
            .or_else(|| caps.get(2).map(|m| m.as_str().trim().to_string()));

        let corner = |col: usize, row: usize| -> TwraResult<(usize, usize)> {
            let row_number: usize = caps[row]
                .parse()
                .map_err(|_| TwraError::InvalidRange(reference.to_string()))?;
            if row_number == 0 {
                return Err(TwraError::InvalidRange(reference.to_string()));
            }
            Ok((row_number - 1, column_letter_to_number(&caps[col])))
        };

        let first = corner(3, 4)?;
        let second = if caps.get(5).is_some() {
            corner(5, 6)?
        } else {
            first
        };

        Ok(Self {
            sheet,
            start: (first.0.min(second.0), first.1.min(second.1)),
            end: (first.0.max(second.0), first.1.max(second.1)),
        })
    }

    pub fn rows(&self) -> Range<usize> {
        self.start.0..self.end.0 + 1
    }

    pub fn cols(&self) -> Range<usize> {
        self.start.1..self.end.1 + 1
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write!(f, "'{}'!", sheet.replace('\'', "''"))?;
        }
        write!(
            f,
            "{}{}:{}{}",
            number_to_column_letter(self.start.1),
            self.start.0 + 1,
            number_to_column_letter(self.end.1),
            self.end.0 + 1
        )
    }
}

/// Convert column index to letters (0→A, 25→Z, 26→AA)
pub fn number_to_column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

/// Convert column letters to index (A→0, Z→25, AA→26). Input must be ASCII letters.
pub fn column_letter_to_number(letters: &str) -> usize {
    letters
        .bytes()
        .fold(0, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A') as usize + 1)
        - 1
}
