//! Grid scanner: partitions a grid into ordered sections

use crate::core::section::{RowKind, SectionBuilder};
use crate::types::{Grid, Section, TerminationMode};
use tracing::debug;

/// Walks a grid row by row and collects every section that has data
#[derive(Debug, Clone, Copy)]
pub struct GridScanner {
    mode: TerminationMode,
    use_abbreviations: bool,
}

impl GridScanner {
    pub fn new(mode: TerminationMode, use_abbreviations: bool) -> Self {
        Self {
            mode,
            use_abbreviations,
        }
    }

    pub fn mode(&self) -> TerminationMode {
        self.mode
    }

    /// Scan the grid. Sections without data rows are left out.
    pub fn scan(&self, grid: &Grid) -> Vec<Section> {
        let height = grid.height();
        let mut sections = Vec::new();
        let mut empty_run = 0;
        let mut row = 0;

        while row < height {
            if grid.is_row_empty(row) {
                if self.mode == TerminationMode::MultiSheetScoped {
                    empty_run += 1;
                    if empty_run >= 2 {
                        debug!(
                            "Detected end of sheet after two consecutive empty rows at row {}",
                            row + 1
                        );
                        break;
                    }
                }
                row += 1;
                continue;
            }
            empty_run = 0;

            let name = match grid.cell(row, 1).as_text() {
                Some(name) if grid.is_section_start(row) => name.to_string(),
                _ => {
                    row += 1;
                    continue;
                }
            };
            debug!("Found section: {} at row {}", name, row + 1);

            // At most one blank row between the name and the header
            if row + 1 < height && grid.is_row_empty(row + 1) {
                row += 1;
            }
            row += 1;

            if row >= height {
                debug!("Section {} has no header row", name);
                break;
            }

            let mut builder = SectionBuilder::new(name, grid, row, self.use_abbreviations);
            row += 1;

            while row < height {
                match builder.classify(grid, row) {
                    RowKind::End => {
                        debug!(
                            "Found empty row at {} - end of section {}",
                            row + 1,
                            builder.name()
                        );
                        break;
                    }
                    RowKind::NextSection => {
                        debug!(
                            "Found new section at row {} while processing {}",
                            row + 1,
                            builder.name()
                        );
                        break;
                    }
                    RowKind::Data(data) => {
                        builder.push(data);
                        row += 1;
                    }
                }
            }

            if let Some(section) = builder.finish() {
                sections.push(section);
            }
        }

        sections
    }
}
