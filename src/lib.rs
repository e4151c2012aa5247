//! TWRA - raid assignment spreadsheets → addon import strings
//!
//! Scans grids of spreadsheet cells for assignment sections, abbreviates
//! icons, classes and header words, and serializes everything into the
//! base64 `TWRA_ImportString` table the Turtle WoW Raid Assignments addon
//! imports.
//!
//! # Example
//!
//! ```
//! use twra::export::{decode, generate};
//! use twra::source::MemorySource;
//! use twra::types::{ExportOptions, Grid};
//!
//! let sheet = Grid::from_rows(vec![
//!     vec!["", "Ragnaros", ""],
//!     vec!["", "Target", "Tank"],
//!     vec!["Skull", "Ragnaros", "Warriors"],
//! ]);
//! let mut source = MemorySource::new().with_sheet("Molten Core", sheet);
//!
//! let encoded = generate(&mut source, &["Molten Core"], ExportOptions::compact());
//! assert!(decode(&encoded).contains("[\"sn\"]=\"Ragnaros\""));
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod export;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use error::{TwraError, TwraResult};
pub use types::{Cell, ExportOptions, Grid, Row, Section, TerminationMode};
