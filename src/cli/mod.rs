//! CLI command handlers

pub mod commands;

pub use commands::{
    abbreviate, compare, decode, generate, preset, presets, range, report, watch, FormatFlags,
};
