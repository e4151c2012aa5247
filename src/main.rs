use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use twra::cli::{self, FormatFlags};
use twra::error::TwraResult;

#[derive(Parser)]
#[command(name = "twra")]
#[command(about = "Turn raid assignment spreadsheets into TWRA addon import strings")]
#[command(long_about = "TWRA - Raid assignment export for the Turtle WoW Raid Assignments addon

Reads sections from a workbook (xlsx, xls, ods) and produces the base64
import string the addon expects.

SHEET LAYOUT:
  Section name in column B with column A empty, optionally followed by one
  blank row, then a header row (B onward) and one data row per assignment.
  Column A holds the raid icon (Skull, Cross, ... or =Skull formulas).

COMMANDS:
  generate   - Import string from whole sheets
  preset     - Import string for a raid preset (e.g. \"Molten Core\")
  presets    - List known presets
  range      - Import string from a single A1 range
  decode     - Show the table text inside an import string
  compare    - Size of normal vs compact output
  report     - List all abbreviations
  abbreviate - Show how values are abbreviated
  watch      - Regenerate whenever the workbook is saved

EXAMPLES:
  twra generate raid.xlsx \"Molten Core\" \"Onyxia's Lair\" --short-keys
  twra preset raid.xlsx \"Naxxramas Full Instance\" -o naxx.txt
  twra range raid.xlsx \"'Blackwing Lair'!A1:F40\"
  twra decode VFdSQV9JbXBvcnRTdHJpbmc9...")]
#[command(version)]
struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct FormatArgs {
    /// Use short field keys (sn/sh/sr)
    #[arg(long, conflicts_with = "long_keys")]
    short_keys: bool,

    /// Use long field keys (Section Name/Section Header/Section Rows)
    #[arg(long)]
    long_keys: bool,

    /// Keep icons, classes and headers unabbreviated
    #[arg(long)]
    no_abbreviations: bool,
}

impl From<FormatArgs> for FormatFlags {
    fn from(args: FormatArgs) -> Self {
        FormatFlags {
            short_keys: args.short_keys,
            long_keys: args.long_keys,
            no_abbreviations: args.no_abbreviations,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Generate an import string from whole sheets.

Sheets are scanned in the order given and their sections numbered
continuously. Missing sheets are skipped with a warning. Two consecutive
empty rows end a sheet.

EXAMPLES:
  twra generate raid.xlsx \"Molten Core\"
  twra generate raid.xlsx \"Spider Wing\" \"Plague Wing\" --short-keys")]
    /// Generate an import string from whole sheets
    Generate {
        /// Path to workbook
        file: PathBuf,

        /// Sheet names (default: first sheet)
        sheets: Vec<String>,

        #[command(flatten)]
        format: FormatArgs,

        /// YAML config file with defaults and presets
        #[arg(short, long, env = "TWRA_CONFIG")]
        config: Option<PathBuf>,

        /// Write the import string to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate an import string for a raid preset
    Preset {
        /// Path to workbook
        file: PathBuf,

        /// Preset name (case-insensitive)
        name: String,

        #[command(flatten)]
        format: FormatArgs,

        /// YAML config file with defaults and presets
        #[arg(short, long, env = "TWRA_CONFIG")]
        config: Option<PathBuf>,

        /// Write the import string to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List known presets
    Presets {
        /// YAML config file with defaults and presets
        #[arg(short, long, env = "TWRA_CONFIG")]
        config: Option<PathBuf>,
    },

    #[command(long_about = "Generate an import string from a single A1 range.

Uses short keys and abbreviations unless told otherwise. Without a range the
whole first sheet is used. Empty rows inside the range are skipped one by one.

RANGE FORMAT:
  Sheet!A1:D20, 'Sheet name'!B2:F40, A1:D20 (first sheet), =Sheet!A1:D20")]
    /// Generate an import string from a single range
    Range {
        /// Path to workbook
        file: PathBuf,

        /// A1 range reference
        range: Option<String>,

        #[command(flatten)]
        format: FormatArgs,

        /// Write the import string to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode an import string to its table text
    Decode {
        /// Base64 import string ("-" or omitted reads stdin)
        encoded: Option<String>,
    },

    /// Compare normal and compact output sizes
    Compare {
        /// Path to workbook
        file: PathBuf,

        /// Sheet to measure (default: first sheet)
        #[arg(short, long, conflicts_with = "range")]
        sheet: Option<String>,

        /// Range to measure instead of a sheet
        #[arg(short, long)]
        range: Option<String>,
    },

    /// List the abbreviation table
    Report,

    /// Show how values are abbreviated
    Abbreviate {
        /// Values to abbreviate
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Regenerate whenever the workbook changes
    Watch {
        /// Path to workbook
        file: PathBuf,

        /// Sheet names (default: first sheet)
        sheets: Vec<String>,

        #[command(flatten)]
        format: FormatArgs,

        /// YAML config file with defaults and presets
        #[arg(short, long, env = "TWRA_CONFIG")]
        config: Option<PathBuf>,

        /// Write the import string to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "twra=debug" } else { "twra=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> TwraResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            file,
            sheets,
            format,
            config,
            output,
        } => cli::generate(file, sheets, format.into(), config, output),

        Commands::Preset {
            file,
            name,
            format,
            config,
            output,
        } => cli::preset(file, name, format.into(), config, output),

        Commands::Presets { config } => cli::presets(config),

        Commands::Range {
            file,
            range,
            format,
            output,
        } => cli::range(file, range, format.into(), output),

        Commands::Decode { encoded } => cli::decode(encoded),

        Commands::Compare { file, sheet, range } => cli::compare(file, sheet, range),

        Commands::Report => cli::report(),

        Commands::Abbreviate { values } => cli::abbreviate(values),

        Commands::Watch {
            file,
            sheets,
            format,
            config,
            output,
        } => cli::watch(file, sheets, format.into(), config, output),
    }
}
