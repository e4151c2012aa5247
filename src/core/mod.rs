//! Section parsing and import string generation

pub mod abbreviation;
pub mod encoder;
pub mod scanner;
pub mod section;
pub mod serializer;

pub use abbreviation::{apply_abbreviation, abbreviation_report, AbbreviationReport};
pub use scanner::GridScanner;
pub use section::{RowKind, SectionBuilder};
pub use serializer::Serializer;
