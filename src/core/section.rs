//! Section builder: header row → width, then one row at a time

use crate::core::abbreviation::apply_abbreviation;
use crate::types::{Grid, Row, Section};
use tracing::debug;

/// What a row following the header turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    /// Empty within the section width
    End,
    /// Start of the next section
    NextSection,
    /// Data row; may be empty if nothing survived coercion
    Data(Row),
}

/// Accumulates one section from its header row onward
#[derive(Debug)]
pub struct SectionBuilder {
    name: String,
    header: Vec<String>,
    rows: Vec<Row>,
    abbreviate: bool,
}

impl SectionBuilder {
    /// Read the header row. Header column 0 is always "Icon"; grid columns
    /// from 1 are taken until the first empty cell.
    pub fn new(name: impl Into<String>, grid: &Grid, header_row: usize, abbreviate: bool) -> Self {
        let name = name.into();
        let mut header = vec!["Icon".to_string()];

        let mut col = 1;
        while col < grid.row_width(header_row) {
            let cell = grid.cell(header_row, col);
            if cell.is_empty() {
                debug!(
                    "Found section boundary at column {} for section: {}",
                    col + 1,
                    name
                );
                break;
            }
            let raw = cell.to_string();
            let token = if abbreviate {
                let abbreviated = apply_abbreviation(&raw);
                debug!("Abbreviated header: {} -> {}", raw, abbreviated);
                abbreviated
            } else {
                raw
            };
            header.push(token);
            col += 1;
        }

        debug!("Section width for {}: {} columns", name, header.len());

        Self {
            name,
            header,
            rows: Vec::new(),
            abbreviate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Icon column plus contiguous header cells
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Classify a row without consuming it
    pub fn classify(&self, grid: &Grid, row: usize) -> RowKind {
        let width = self.width();

        if grid.is_span_empty(row, 0..width) {
            return RowKind::End;
        }

        if grid.is_section_start(row) && grid.is_span_empty(row, 2..width) {
            return RowKind::NextSection;
        }

        RowKind::Data(self.build_row(grid, row))
    }

    fn build_row(&self, grid: &Grid, row: usize) -> Row {
        let mut data = Row::new();

        let icon_cell = grid.cell(row, 0);
        if !icon_cell.is_empty() {
            // Icons are usually formulas like `=Skull`; the name is in the formula text
            let icon = match grid.formula(row, 0).strip_prefix('=') {
                Some(name) => Some(name.to_string()),
                None => icon_cell.coerce_text(),
            };
            if let Some(icon) = icon {
                data.insert(1, self.abbreviate_value(icon));
            }
        }

        for col in 1..self.width() {
            let cell = grid.cell(row, col);
            if cell.is_empty() {
                continue;
            }
            let value = match cell.as_text() {
                Some(text) => self.abbreviate_value(text.to_string()),
                None => match cell.coerce_text() {
                    Some(text) => text,
                    None => {
                        debug!(
                            "Dropping uncoercible value {} at row {} column {}",
                            cell,
                            row + 1,
                            col + 1
                        );
                        continue;
                    }
                },
            };
            data.insert(col + 1, value);
        }

        data
    }

    fn abbreviate_value(&self, value: String) -> String {
        if self.abbreviate {
            let abbreviated = apply_abbreviation(&value);
            if abbreviated != value {
                debug!("Abbreviated value: {} -> {}", value, abbreviated);
            }
            abbreviated
        } else {
            value
        }
    }

    /// Append a data row; empty rows are ignored
    pub fn push(&mut self, row: Row) {
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    /// The finished section, or `None` if it never received a row
    pub fn finish(self) -> Option<Section> {
        if self.rows.is_empty() {
            debug!("Skipping empty section: {}", self.name);
            return None;
        }
        Some(Section {
            name: self.name,
            header: self.header,
            rows: self.rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn raid_grid() -> Grid {
        Grid::from_rows(vec![
            vec![Cell::Empty, "Target".into(), "Tank".into(), "Heal".into()],
            vec!["Skull".into(), "Ragnaros".into(), "Warriors".into(), "Group 2".into()],
            vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty, "far".into()],
            vec![Cell::Empty, "Adds".into(), Cell::Empty, Cell::Empty],
        ])
        .with_formulas(vec![vec![], vec!["=Skull".to_string()]])
    }

    #[test]
    fn test_header_and_width() {
        let grid = raid_grid();
        let builder = SectionBuilder::new("Ragnaros", &grid, 0, true);
        assert_eq!(builder.header(), &["Icon", "Target", "T", "H"]);
        assert_eq!(builder.width(), 4);
    }

    #[test]
    fn test_header_stops_at_first_empty() {
        let grid = Grid::from_rows(vec![vec![
            Cell::Empty,
            "Target".into(),
            Cell::Empty,
            "Ignored".into(),
        ]]);
        let builder = SectionBuilder::new("s", &grid, 0, true);
        assert_eq!(builder.header(), &["Icon", "Target"]);
        assert_eq!(builder.width(), 2);
    }

    #[test]
    fn test_header_without_abbreviation() {
        let grid = raid_grid();
        let builder = SectionBuilder::new("Ragnaros", &grid, 0, false);
        assert_eq!(builder.header(), &["Icon", "Target", "Tank", "Heal"]);
    }

    #[test]
    fn test_classify_data_row_uses_formula_icon() {
        let grid = raid_grid();
        let builder = SectionBuilder::new("Ragnaros", &grid, 0, true);
        match builder.classify(&grid, 1) {
            RowKind::Data(row) => {
                assert_eq!(row.get(1), Some("8"));
                assert_eq!(row.get(2), Some("Ragnaros"));
                assert_eq!(row.get(3), Some("W"));
                assert_eq!(row.get(4), Some("G2"));
            }
            other => panic!("Expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_end_ignores_cells_beyond_width() {
        let grid = raid_grid();
        let builder = SectionBuilder::new("Ragnaros", &grid, 0, true);
        assert_eq!(builder.classify(&grid, 2), RowKind::End);
    }

    #[test]
    fn test_classify_next_section() {
        let grid = raid_grid();
        let builder = SectionBuilder::new("Ragnaros", &grid, 0, true);
        assert_eq!(builder.classify(&grid, 3), RowKind::NextSection);
    }

    #[test]
    fn test_name_with_assignments_is_data_not_section() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Empty, "Target".into(), "Tank".into()],
            vec![Cell::Empty, "Adds".into(), "Warriors".into()],
        ]);
        let builder = SectionBuilder::new("s", &grid, 0, true);
        match builder.classify(&grid, 1) {
            RowKind::Data(row) => {
                assert_eq!(row.get(1), None);
                assert_eq!(row.get(2), Some("Adds"));
                assert_eq!(row.get(3), Some("W"));
            }
            other => panic!("Expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_non_text_values_coerced_and_errors_dropped() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Empty, "Count".into(), "Ready".into(), "Note".into()],
            vec![
                Cell::Number(7.0),
                Cell::Number(2.5),
                Cell::Boolean(false),
                Cell::Error("#REF!".to_string()),
            ],
        ]);
        let builder = SectionBuilder::new("s", &grid, 0, true);
        match builder.classify(&grid, 1) {
            RowKind::Data(row) => {
                assert_eq!(row.get(1), Some("7"));
                assert_eq!(row.get(2), Some("2.5"));
                assert_eq!(row.get(3), Some("false"));
                assert_eq!(row.get(4), None);
            }
            other => panic!("Expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_icon_formula_without_equals_uses_value() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Empty, "Target".into()],
            vec!["Moon".into(), "Add".into()],
        ])
        .with_formulas(vec![vec![], vec!["Skull".to_string()]]);
        let builder = SectionBuilder::new("s", &grid, 0, true);
        match builder.classify(&grid, 1) {
            RowKind::Data(row) => assert_eq!(row.get(1), Some("5")),
            other => panic!("Expected data row, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_drops_empty_section() {
        let grid = raid_grid();
        let mut builder = SectionBuilder::new("Ragnaros", &grid, 0, true);
        builder.push(Row::new());
        assert!(builder.finish().is_none());
    }

    #[test]
    fn test_finish_keeps_rows() {
        let grid = raid_grid();
        let mut builder = SectionBuilder::new("Ragnaros", &grid, 0, true);
        if let RowKind::Data(row) = builder.classify(&grid, 1) {
            builder.push(row);
        }
        let section = builder.finish().unwrap();
        assert_eq!(section.name, "Ragnaros");
        assert_eq!(section.rows.len(), 1);
        assert_eq!(section.width(), 4);
    }
}
