//! Spreadsheet file import
//!
//! Reads workbooks with calamine and exposes every sheet as a [`Grid`](crate::types::Grid)
//! of typed values plus the raw formula text behind them.

mod importer;

pub use importer::WorkbookReader;
