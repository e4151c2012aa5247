//! Workbook reading tests against real .xlsx files

mod common;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use twra::error::TwraError;
use twra::excel::WorkbookReader;
use twra::export::{self, RangeInput};
use twra::source::SheetSource;
use twra::types::{Cell, ExportOptions, RangeRef};

// ═══════════════════════════════════════════════════════════════════════════
// READER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_sheet_names_in_workbook_order() {
    let dir = TempDir::new().unwrap();
    let path = common::raid_workbook(dir.path());
    let reader = WorkbookReader::open(&path).unwrap();

    assert_eq!(reader.sheet_names(), vec!["Molten Core", "Onyxia's Lair"]);
    assert_eq!(reader.active_sheet().as_deref(), Some("Molten Core"));
    assert_eq!(reader.path(), path.as_path());
}

#[test]
fn test_read_sheet_values_and_formulas() {
    let dir = TempDir::new().unwrap();
    let path = common::raid_workbook(dir.path());
    let mut reader = WorkbookReader::open(&path).unwrap();

    let grid = reader.read_sheet("Molten Core").unwrap();
    assert_eq!(grid.height(), 4);
    assert_eq!(grid.cell(0, 1), &Cell::text("Lucifron"));
    assert!(grid.cell(0, 0).is_empty());
    assert_eq!(grid.formula(2, 0), "=Skull");
    assert_eq!(grid.formula(2, 1), "");
}

#[test]
fn test_read_missing_sheet() {
    let dir = TempDir::new().unwrap();
    let path = common::raid_workbook(dir.path());
    let mut reader = WorkbookReader::open(&path).unwrap();

    assert!(matches!(
        reader.read_sheet("Naxxramas"),
        Err(TwraError::SheetNotFound(name)) if name == "Naxxramas"
    ));
}

#[test]
fn test_read_range_window() {
    let dir = TempDir::new().unwrap();
    let path = common::raid_workbook(dir.path());
    let mut reader = WorkbookReader::open(&path).unwrap();

    let range = RangeRef::parse("'Molten Core'!B2:C3").unwrap();
    let grid = reader.read_range(&range).unwrap();
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.cell(0, 0), &Cell::text("Target"));
    assert_eq!(grid.cell(1, 1), &Cell::text("Warriors"));
}

#[test]
fn test_open_rejects_non_workbook() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not a workbook").unwrap();

    assert!(matches!(
        WorkbookReader::open(&path),
        Err(TwraError::Workbook(_))
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT FROM WORKBOOK
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_icons_come_from_formula_text() {
    let dir = TempDir::new().unwrap();
    let path = common::raid_workbook(dir.path());
    let mut reader = WorkbookReader::open(&path).unwrap();

    let text = export::decode(&export::generate(
        &mut reader,
        &["Molten Core"],
        ExportOptions::compact(),
    ));
    assert!(text.contains("[1]={[1]=\"8\",[2]=\"Lucifron\",[3]=\"W\",[4]=\"Pr\",}"));
    assert!(text.contains("[2]={[1]=\"7\",[2]=\"Protector\",[3]=\"D\",}"));

    let text = export::decode(&export::generate(
        &mut reader,
        &["Molten Core"],
        ExportOptions::expanded(),
    ));
    assert!(text.contains("[1]={[1]=\"Skull\","));
}

#[test]
fn test_range_from_workbook_without_range_uses_first_sheet() {
    let dir = TempDir::new().unwrap();
    let path = common::raid_workbook(dir.path());
    let mut reader = WorkbookReader::open(&path).unwrap();

    let text = export::decode(&export::generate_from_range(
        &mut reader,
        &RangeInput::Missing,
        ExportOptions::compact(),
    ));
    assert!(text.contains("[\"sn\"]=\"Lucifron\""));
    assert!(!text.contains("Phase 2"));
}

#[test]
fn test_range_on_second_sheet() {
    let dir = TempDir::new().unwrap();
    let path = common::raid_workbook(dir.path());
    let mut reader = WorkbookReader::open(&path).unwrap();

    let input = RangeInput::from_arg(Some("='Onyxia''s Lair'!A1:C4"));
    let text = export::decode(&export::generate_from_range(
        &mut reader,
        &input,
        ExportOptions::compact(),
    ));
    assert!(text.contains("[\"sn\"]=\"Phase 2\""));
    assert!(text.contains("[3]=\"G9\""));
}
