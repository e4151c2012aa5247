use crate::config::Config;
use crate::core::abbreviation::{abbreviation_report, describe_abbreviation};
use crate::error::{TwraError, TwraResult};
use crate::excel::WorkbookReader;
use crate::export::{self, CompareTarget, RangeInput};
use crate::source::SheetSource;
use crate::types::{ExportOptions, Section};
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Output format switches shared by the generating commands
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatFlags {
    pub short_keys: bool,
    pub long_keys: bool,
    pub no_abbreviations: bool,
}

impl FormatFlags {
    /// Apply the flags on top of a base set of options
    pub fn apply(&self, mut options: ExportOptions) -> ExportOptions {
        if self.short_keys {
            options.prefer_short_keys = true;
        }
        if self.long_keys {
            options.prefer_short_keys = false;
        }
        if self.no_abbreviations {
            options.use_abbreviations = false;
        }
        options
    }
}

/// Execute the generate command
pub fn generate(
    file: PathBuf,
    sheets: Vec<String>,
    flags: FormatFlags,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> TwraResult<()> {
    let config = Config::load(config.as_deref())?;
    let options = flags.apply(config.options);

    eprintln!("{}", "⚔️  TWRA - Generating import string".bold().green());
    eprintln!("   Workbook: {}", file.display());

    let mut workbook = WorkbookReader::open(&file)?;
    let sheets = if sheets.is_empty() {
        let active = workbook
            .active_sheet()
            .ok_or_else(|| TwraError::Workbook("Workbook has no sheets".to_string()))?;
        eprintln!("   No sheets given, using {}", active.bright_yellow());
        vec![active]
    } else {
        sheets
    };
    eprintln!("   Sheets: {}", sheets.join(", ").bright_blue());

    for missing in sheets.iter().filter(|s| !workbook.has_sheet(s)) {
        eprintln!("   {} Sheet not found: {}", "⚠️".yellow(), missing.yellow());
    }

    let sections = export::collect_sheet_sections(&mut workbook, &sheets, options.use_abbreviations);
    finish(&sections, options, output.as_deref())
}

/// Execute the preset command
pub fn preset(
    file: PathBuf,
    name: String,
    flags: FormatFlags,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> TwraResult<()> {
    let config = Config::load(config.as_deref())?;
    let options = flags.apply(config.options);
    let (preset_name, preset_sheets) = config
        .preset(&name)
        .ok_or_else(|| TwraError::Config(format!("Unknown preset: {}", name)))?;

    eprintln!("{}", "⚔️  TWRA - Generating preset".bold().green());
    eprintln!("   Workbook: {}", file.display());
    eprintln!("   Preset: {}", preset_name.bright_yellow().bold());

    let mut workbook = WorkbookReader::open(&file)?;
    let sheets = export::resolve_preset_sheets(&workbook, preset_sheets);
    eprintln!("   Sheets: {}", sheets.join(", ").bright_blue());

    let sections = export::collect_sheet_sections(&mut workbook, &sheets, options.use_abbreviations);
    finish(&sections, options, output.as_deref())
}

/// Execute the presets command - list configured presets
pub fn presets(config: Option<PathBuf>) -> TwraResult<()> {
    let config = Config::load(config.as_deref())?;

    println!("{}", "📋 TWRA Presets".bold().green());
    for (name, sheets) in &config.presets {
        println!("   {} → {}", name.bright_blue().bold(), sheets.join(", "));
    }

    Ok(())
}

/// Execute the range command
pub fn range(
    file: PathBuf,
    range: Option<String>,
    flags: FormatFlags,
    output: Option<PathBuf>,
) -> TwraResult<()> {
    let options = flags.apply(ExportOptions::compact());
    let input = RangeInput::from_arg(range.as_deref());

    eprintln!("{}", "⚔️  TWRA - Generating from range".bold().green());
    eprintln!("   Workbook: {}", file.display());
    match &input {
        RangeInput::Reference(r) => eprintln!("   Range: {}", r.to_string().bright_blue()),
        RangeInput::Missing => eprintln!("   Range: {}", "active sheet".bright_yellow()),
        _ => {}
    }

    let mut workbook = WorkbookReader::open(&file)?;
    let sections = match export::range_sections(&mut workbook, &input, options.use_abbreviations) {
        Ok(sections) => sections,
        Err(e) => {
            eprintln!("{}", export::range_error_message(&e).red());
            return Err(e);
        }
    };

    finish(&sections, options, output.as_deref())
}

/// Execute the decode command. `-` or no argument reads stdin.
pub fn decode(encoded: Option<String>) -> TwraResult<()> {
    let encoded = match encoded.as_deref() {
        Some(value) if value != "-" => value.to_string(),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let text = crate::core::encoder::decode(&encoded)?;
    println!("{}", text);
    Ok(())
}

/// Execute the compare command
pub fn compare(file: PathBuf, sheet: Option<String>, range: Option<String>) -> TwraResult<()> {
    let mut workbook = WorkbookReader::open(&file)?;

    let target = match (sheet, range) {
        (Some(sheet), _) => CompareTarget::Sheet(sheet),
        (None, Some(range)) => CompareTarget::Range(RangeInput::from_arg(Some(&range))),
        (None, None) => CompareTarget::Sheet(
            workbook
                .active_sheet()
                .ok_or_else(|| TwraError::Workbook("Workbook has no sheets".to_string()))?,
        ),
    };

    let comparison = match export::compare(&mut workbook, &target) {
        Ok(comparison) => comparison,
        Err(message) => {
            eprintln!("{}", message.red());
            return Err(TwraError::InvalidRange(message));
        }
    };

    println!("{}", "📏 TWRA - Size Comparison".bold().green());
    println!("   Workbook: {}", file.display());
    println!("   Normal size:  {}", comparison.normal.to_string().bold());
    println!("   Compact size: {}", comparison.compact.to_string().bold());
    println!(
        "   Reduction:    {}",
        comparison.reduction_label().bold().green()
    );

    Ok(())
}

/// Execute the report command - print the abbreviation table
pub fn report() -> TwraResult<()> {
    let report = abbreviation_report();

    println!("{}", "📖 TWRA Abbreviations".bold().green());
    println!("   {:<20} {}", "Original".bold(), "Abbreviation".bold());
    for entry in &report.entries {
        println!("   {:<20} {}", entry.original, entry.abbreviation.cyan());
    }

    println!("\n{}", "Pattern-Based Replacements".bold());
    for pattern in &report.patterns {
        println!("   {:<20} {}", pattern.original, pattern.abbreviation.cyan());
    }

    Ok(())
}

/// Execute the abbreviate command - show how values would be abbreviated
pub fn abbreviate(values: Vec<String>) -> TwraResult<()> {
    for value in &values {
        println!("{}", describe_abbreviation(value));
    }
    Ok(())
}

/// Execute the watch command - regenerate whenever the workbook is saved
pub fn watch(
    file: PathBuf,
    sheets: Vec<String>,
    flags: FormatFlags,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
) -> TwraResult<()> {
    eprintln!("{}", "👁️  TWRA - Watch Mode".bold().green());
    eprintln!("   Watching: {}", file.display());
    eprintln!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !file.exists() {
        return Err(TwraError::Watch(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let canonical_path = file.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| TwraError::Watch("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();

    // Spreadsheet apps write through temp files; debounce the burst
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)
        .map_err(|e| TwraError::Watch(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| TwraError::Watch(format!("Failed to watch directory: {}", e)))?;

    eprintln!("{}", "🔄 Initial run...".cyan());
    run_watch_action(&file, &sheets, flags, config.as_deref(), output.as_deref());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    if event.kind != DebouncedEventKind::Any {
                        return false;
                    }
                    if let Ok(event_canonical) = event.path.canonicalize() {
                        if event_canonical == canonical_path {
                            return true;
                        }
                    }
                    event.path.file_name() == canonical_path.file_name()
                });

                if relevant {
                    eprintln!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        timestamp().cyan()
                    );
                    run_watch_action(&file, &sheets, flags, config.as_deref(), output.as_deref());
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

/// Wall-clock time of day without a date library
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02} UTC", hours, minutes, seconds)
}

fn run_watch_action(
    file: &Path,
    sheets: &[String],
    flags: FormatFlags,
    config: Option<&Path>,
    output: Option<&Path>,
) {
    match generate(
        file.to_path_buf(),
        sheets.to_vec(),
        flags,
        config.map(Path::to_path_buf),
        output.map(Path::to_path_buf),
    ) {
        Ok(()) => eprintln!("{}", "✅ Import string updated".bold().green()),
        Err(e) => eprintln!("{} {}", "❌ Generation failed:".bold().red(), e),
    }
}

/// Print the section summary and write the import string
fn finish(sections: &[Section], options: ExportOptions, output: Option<&Path>) -> TwraResult<()> {
    if sections.is_empty() {
        eprintln!("   {} No sections with data found", "⚠️".yellow());
    }
    for (index, section) in sections.iter().enumerate() {
        eprintln!(
            "   [{}] {} ({} columns, {} rows)",
            index + 1,
            section.name.bright_blue().bold(),
            section.width(),
            section.rows.len()
        );
    }

    let encoded = export::render(sections, options);

    match output {
        Some(path) => {
            fs::write(path, &encoded)?;
            eprintln!(
                "{} {} ({} characters)",
                "✅ Written to".bold().green(),
                path.display(),
                encoded.len()
            );
        }
        None => {
            println!("{}", encoded);
            eprintln!(
                "{} ({} characters)",
                "✅ Import string ready".bold().green(),
                encoded.len()
            );
        }
    }

    Ok(())
}
