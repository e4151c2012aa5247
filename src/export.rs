//! Import string generation entry points
//!
//! Everything here returns plain strings: either the base64 import string or a
//! readable `Error...` message. Callers paste the result straight into the game,
//! so failures are reported as text instead of aborting the caller.

use crate::core::encoder;
use crate::core::{GridScanner, Serializer};
use crate::error::{TwraError, TwraResult};
use crate::source::SheetSource;
use crate::types::{ExportOptions, RangeRef, Section, TerminationMode};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// How a caller pointed at the cells to export
#[derive(Debug, Clone, PartialEq)]
pub enum RangeInput {
    /// A parsed A1 reference
    Reference(RangeRef),
    /// Written as a reference (`=...`) but not a valid one
    Invalid(String),
    /// Plain text where a reference was expected
    Text(String),
    /// Nothing given; the active sheet's data range is used
    Missing,
}

impl RangeInput {
    /// Interpret a command-line or request argument.
    ///
    /// `=Raid!A1:D20` and `Raid!A1:D20` are references; anything else is text.
    pub fn from_arg(arg: Option<&str>) -> Self {
        let Some(arg) = arg.map(str::trim).filter(|a| !a.is_empty()) else {
            return RangeInput::Missing;
        };

        match arg.strip_prefix('=') {
            Some(reference) => match RangeRef::parse(reference) {
                Ok(range) => RangeInput::Reference(range),
                Err(_) => RangeInput::Invalid(arg.to_string()),
            },
            None => match RangeRef::parse(arg) {
                Ok(range) => RangeInput::Reference(range),
                Err(_) => RangeInput::Text(arg.to_string()),
            },
        }
    }
}

/// Serialize and base64-encode sections
pub fn render(sections: &[Section], options: ExportOptions) -> String {
    let text = Serializer::new(options.field_keys()).serialize(sections);
    encoder::encode(&text)
}

/// Scan each named sheet in order. Missing sheets are logged and skipped.
pub fn collect_sheet_sections<S, N>(
    source: &mut S,
    sheet_names: &[N],
    use_abbreviations: bool,
) -> Vec<Section>
where
    S: SheetSource + ?Sized,
    N: AsRef<str>,
{
    let scanner = GridScanner::new(TerminationMode::MultiSheetScoped, use_abbreviations);
    let mut sections = Vec::new();

    for name in sheet_names {
        let name = name.as_ref();
        match source.read_sheet(name) {
            Ok(grid) => {
                let found = scanner.scan(&grid);
                debug!("Found {} valid sections in sheet: {}", found.len(), name);
                sections.extend(found);
            }
            Err(e) => warn!("Skipping sheet {}: {}", name, e),
        }
    }

    sections
}

/// Build the import string from whole sheets
pub fn generate<S, N>(source: &mut S, sheet_names: &[N], options: ExportOptions) -> String
where
    S: SheetSource + ?Sized,
    N: AsRef<str>,
{
    let started = Instant::now();
    let sections = collect_sheet_sections(source, sheet_names, options.use_abbreviations);
    let encoded = render(&sections, options);

    debug!("TWRA processing time: {:?}", started.elapsed());
    info!(
        "TWRA completed with {} valid sections: {}",
        sections.len(),
        sections
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    encoded
}

/// Pick the sheets of a preset that exist, falling back to the active sheet
pub fn resolve_preset_sheets<S>(source: &S, preset_sheets: &[String]) -> Vec<String>
where
    S: SheetSource + ?Sized,
{
    let available = source.sheet_names();
    let mut resolved: Vec<String> = Vec::new();

    for sheet in preset_sheets {
        if available.contains(sheet) {
            if !resolved.contains(sheet) {
                resolved.push(sheet.clone());
            }
        } else {
            warn!("Preset sheet not found: {}", sheet);
        }
    }

    if resolved.is_empty() {
        if let Some(active) = source.active_sheet() {
            warn!("Couldn't find sheets matching preset, using active sheet {} instead", active);
            resolved.push(active);
        }
    }

    resolved
}

/// Build the import string for a preset's sheets
pub fn generate_preset<S>(source: &mut S, preset_sheets: &[String], options: ExportOptions) -> String
where
    S: SheetSource + ?Sized,
{
    let sheets = resolve_preset_sheets(&*source, preset_sheets);
    generate(source, &sheets, options)
}

/// Scan a range. Errors come back as `Err`; see [`generate_from_range`] for the string form.
pub fn range_sections<S>(
    source: &mut S,
    input: &RangeInput,
    use_abbreviations: bool,
) -> TwraResult<Vec<Section>>
where
    S: SheetSource + ?Sized,
{
    let grid = match input {
        RangeInput::Reference(range) => source.read_range(range)?,
        RangeInput::Invalid(arg) => return Err(TwraError::InvalidRange(arg.clone())),
        RangeInput::Text(arg) => return Err(TwraError::RangeAsText(arg.clone())),
        RangeInput::Missing => {
            let active = source.active_sheet().ok_or(TwraError::NoActiveSheet)?;
            info!("No range provided, falling back to data range of sheet {}", active);
            source.read_sheet(&active)?
        }
    };

    let sections = GridScanner::new(TerminationMode::RangeScoped, use_abbreviations).scan(&grid);
    debug!("TWRA range processing found {} valid sections", sections.len());
    Ok(sections)
}

/// Build the import string from a single range
pub fn generate_from_range<S>(source: &mut S, input: &RangeInput, options: ExportOptions) -> String
where
    S: SheetSource + ?Sized,
{
    let started = Instant::now();
    let result = range_sections(source, input, options.use_abbreviations)
        .map(|sections| render(&sections, options));
    debug!("TWRA range processing time: {:?}", started.elapsed());

    result.unwrap_or_else(|e| range_error_message(&e))
}

/// Readable message for a range failure
pub fn range_error_message(error: &TwraError) -> String {
    match error {
        TwraError::RangeAsText(arg) => format!(
            "Error: \"{}\" was entered as text, not a cell range. Please select a valid range such as 'Sheet1'!A1:D20.",
            arg
        ),
        TwraError::InvalidRange(_) => {
            "Error: Invalid range. Please select a valid cell range.".to_string()
        }
        TwraError::NoActiveSheet => {
            "Error: Invalid range provided and couldn't fall back to active sheet.".to_string()
        }
        other => format!("Error: {}. Please provide a valid range.", other),
    }
}

/// Decode an import string back to its table text
pub fn decode(encoded: &str) -> String {
    match encoder::decode(encoded) {
        Ok(text) => text,
        Err(TwraError::Decode(reason)) => format!("Error decoding: {}", reason),
        Err(e) => format!("Error decoding: {}", e),
    }
}

/// What to measure in [`compare`]
#[derive(Debug, Clone, PartialEq)]
pub enum CompareTarget {
    Sheet(String),
    Range(RangeInput),
}

/// Size of the expanded vs. compact import string
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeComparison {
    /// Long keys, no abbreviations
    pub normal: usize,
    /// Short keys and abbreviations
    pub compact: usize,
}

impl SizeComparison {
    /// Percentage saved by the compact form
    pub fn reduction(&self) -> f64 {
        if self.normal == 0 {
            return 0.0;
        }
        (self.normal as f64 - self.compact as f64) / self.normal as f64 * 100.0
    }

    pub fn reduction_label(&self) -> String {
        format!("{:.2}%", self.reduction())
    }
}

/// Compare output sizes for one sheet or range
pub fn compare<S>(source: &mut S, target: &CompareTarget) -> Result<SizeComparison, String>
where
    S: SheetSource + ?Sized,
{
    let measure = |source: &mut S, options: ExportOptions| -> Result<usize, String> {
        let encoded = match target {
            CompareTarget::Sheet(name) => generate(source, std::slice::from_ref(name), options),
            CompareTarget::Range(input) => range_sections(source, input, options.use_abbreviations)
                .map(|sections| render(&sections, options))
                .map_err(|e| range_error_message(&e))?,
        };
        Ok(encoded.len())
    };

    Ok(SizeComparison {
        normal: measure(&mut *source, ExportOptions::expanded())?,
        compact: measure(&mut *source, ExportOptions::compact())?,
    })
}
