//! Workbook fixtures shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::{Formula, Workbook};
use std::path::{Path, PathBuf};

/// Cells of one fixture sheet; an entry starting with `=` becomes an icon formula
pub type SheetRows<'a> = &'a [&'a [&'a str]];

pub fn molten_core() -> SheetRows<'static> {
    &[
        &["", "Lucifron", "", ""],
        &["", "Target", "Tank", "Heal"],
        &["=Skull", "Lucifron", "Warriors", "Priests"],
        &["=Cross", "Protector", "Druids", ""],
    ]
}

pub fn onyxia() -> SheetRows<'static> {
    &[
        &["", "Phase 2", ""],
        &["", "", ""],
        &["", "Target", "Interrupt"],
        &["", "Whelps", "Group 9"],
    ]
}

/// Write a workbook with the given sheets, in order
pub fn write_workbook(path: &Path, sheets: &[(&str, SheetRows)]) -> PathBuf {
    let mut workbook = Workbook::new();

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();

        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let (r, c) = (r as u32, c as u16);
                match value.strip_prefix('=') {
                    Some(icon) => {
                        worksheet
                            .write_formula(r, c, Formula::new(*value).set_result(icon))
                            .unwrap();
                    }
                    None => {
                        worksheet.write_string(r, c, *value).unwrap();
                    }
                }
            }
        }
    }

    workbook.save(path).unwrap();
    path.to_path_buf()
}

/// The standard two-sheet raid workbook
pub fn raid_workbook(dir: &Path) -> PathBuf {
    write_workbook(
        &dir.join("raid.xlsx"),
        &[("Molten Core", molten_core()), ("Onyxia's Lair", onyxia())],
    )
}
