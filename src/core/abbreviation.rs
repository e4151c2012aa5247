//! Abbreviation table for icons, classes, groups and header words
//!
//! The addon ships the same table, so every code here expands back to its
//! original on the game side. Codes are never keys themselves, which keeps
//! `apply_abbreviation` idempotent.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Exact-match abbreviations, in table order
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    // Raid target icons
    ("Star", "1"),
    ("Circle", "2"),
    ("Diamond", "3"),
    ("Triangle", "4"),
    ("Moon", "5"),
    ("Square", "6"),
    ("Cross", "7"),
    ("Skull", "8"),
    ("GUID", "9"),
    ("Warning", "!"),
    ("Note", "?"),
    // Classes and groups
    ("Druids", "D"),
    ("Hunters", "H"),
    ("Mages", "M"),
    ("Paladins", "Pa"),
    ("Priests", "Pr"),
    ("Rogues", "R"),
    ("Shamans", "S"),
    ("Warriors", "W"),
    ("Warlocks", "Wl"),
    ("Group", "G"),
    ("Groups", "Gr"),
    ("Group 1", "G1"),
    ("Group 2", "G2"),
    ("Group 3", "G3"),
    ("Group 4", "G4"),
    ("Group 5", "G5"),
    ("Group 6", "G6"),
    ("Group 7", "G7"),
    ("Group 8", "G8"),
    // Header words
    ("Tank", "T"),
    ("Heal", "H"),
    ("Healer", "He"),
    ("Interrupt", "I"),
    ("Banish", "B"),
    ("Decurse", "Dc"),
    ("Depoison", "Dp"),
    ("Dispell", "Ds"),
    ("Dedisease", "Dd"),
    ("Ranged Interrupt", "Ri"),
    ("Pull", "P"),
    ("Kite", "K"),
];

/// Rewrite rule applied when no exact abbreviation exists
pub struct PatternRule {
    pub pattern: &'static str,
    pub description: &'static str,
    regex: Regex,
    rewrite: fn(&Captures) -> String,
}

impl PatternRule {
    fn apply(&self, value: &str) -> Option<String> {
        self.regex.captures(value).map(|caps| (self.rewrite)(&caps))
    }
}

lazy_static! {
    static ref FORWARD: HashMap<&'static str, &'static str> =
        ABBREVIATIONS.iter().copied().collect();

    // Later entries win for shared codes ("H" is both Hunters and Heal)
    static ref REVERSE: HashMap<&'static str, &'static str> =
        ABBREVIATIONS.iter().map(|(full, code)| (*code, *full)).collect();

    /// Ordered pattern rules; first match wins
    pub static ref PATTERN_RULES: Vec<PatternRule> = vec![PatternRule {
        pattern: r"^Group ([0-9]+)$",
        description: "Group N → GN for any group number",
        regex: Regex::new(r"^Group ([0-9]+)$").unwrap(),
        rewrite: |caps| format!("G{}", &caps[1]),
    }];
}

/// Abbreviate a value: exact table lookup, then pattern rules, else unchanged
pub fn apply_abbreviation(value: &str) -> String {
    if let Some(code) = FORWARD.get(value) {
        return (*code).to_string();
    }

    PATTERN_RULES
        .iter()
        .find_map(|rule| rule.apply(value))
        .unwrap_or_else(|| value.to_string())
}

/// Reverse lookup of an exact-table code
pub fn expand_abbreviation(code: &str) -> Option<&'static str> {
    REVERSE.get(code).copied()
}

/// Human-readable result of abbreviating `input`
pub fn describe_abbreviation(input: &str) -> String {
    let abbreviated = apply_abbreviation(input);
    if abbreviated != input {
        format!("{input} → {abbreviated}")
    } else {
        format!("{input} (no abbreviation)")
    }
}

/// One line of the abbreviation report
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReportEntry {
    pub original: String,
    pub abbreviation: String,
}

/// Full listing of the table and its pattern rules
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AbbreviationReport {
    /// Sorted longest original first; ties keep table order
    pub entries: Vec<ReportEntry>,
    pub patterns: Vec<ReportEntry>,
}

impl AbbreviationReport {
    /// Report rows laid out as a two-column sheet
    pub fn to_table(&self) -> Vec<[String; 2]> {
        let mut table = vec![["Original".to_string(), "Abbreviation".to_string()]];
        table.extend(
            self.entries
                .iter()
                .map(|e| [e.original.clone(), e.abbreviation.clone()]),
        );
        table.push([String::new(), String::new()]);
        table.push(["Pattern-Based Replacements".to_string(), String::new()]);
        table.extend(
            self.patterns
                .iter()
                .map(|e| [e.original.clone(), e.abbreviation.clone()]),
        );
        table
    }
}

pub fn abbreviation_report() -> AbbreviationReport {
    let mut items: Vec<&(&str, &str)> = ABBREVIATIONS.iter().collect();
    // sort_by_key is stable
    items.sort_by_key(|(full, _)| std::cmp::Reverse(full.chars().count()));

    AbbreviationReport {
        entries: items
            .into_iter()
            .map(|(full, code)| ReportEntry {
                original: (*full).to_string(),
                abbreviation: (*code).to_string(),
            })
            .collect(),
        patterns: PATTERN_RULES
            .iter()
            .map(|rule| ReportEntry {
                original: format!("/{}/", rule.pattern),
                abbreviation: "Dynamic replacement".to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(apply_abbreviation("Skull"), "8");
        assert_eq!(apply_abbreviation("Warning"), "!");
        assert_eq!(apply_abbreviation("Warlocks"), "Wl");
        assert_eq!(apply_abbreviation("Group 3"), "G3");
        assert_eq!(apply_abbreviation("Ranged Interrupt"), "Ri");
    }

    #[test]
    fn test_group_pattern_beyond_table() {
        assert_eq!(apply_abbreviation("Group 9"), "G9");
        assert_eq!(apply_abbreviation("Group 12"), "G12");
        assert_eq!(apply_abbreviation("Group x"), "Group x");
        assert_eq!(apply_abbreviation("Group 9 "), "Group 9 ");
    }

    #[test]
    fn test_identity_fallback() {
        assert_eq!(apply_abbreviation("Raider1"), "Raider1");
        assert_eq!(apply_abbreviation("skull"), "skull");
        assert_eq!(apply_abbreviation(""), "");
    }

    #[test]
    fn test_codes_are_fixed_points() {
        for (full, code) in ABBREVIATIONS {
            let once = apply_abbreviation(full);
            assert_eq!(apply_abbreviation(&once), once, "code {code} is not stable");
        }
        assert_eq!(apply_abbreviation(&apply_abbreviation("Group 40")), "G40");
    }

    #[test]
    fn test_no_code_is_a_key() {
        for (_, code) in ABBREVIATIONS {
            assert!(!FORWARD.contains_key(code), "{code} is also a key");
        }
    }

    #[test]
    fn test_expand_abbreviation() {
        assert_eq!(expand_abbreviation("8"), Some("Skull"));
        assert_eq!(expand_abbreviation("Wl"), Some("Warlocks"));
        assert_eq!(expand_abbreviation("H"), Some("Heal"));
        assert_eq!(expand_abbreviation("Zz"), None);
    }

    #[test]
    fn test_describe_abbreviation() {
        assert_eq!(describe_abbreviation("Moon"), "Moon → 5");
        assert_eq!(describe_abbreviation("Raider1"), "Raider1 (no abbreviation)");
    }

    #[test]
    fn test_report_sorted_longest_first() {
        let report = abbreviation_report();
        assert_eq!(report.entries.len(), ABBREVIATIONS.len());
        assert_eq!(report.entries[0].original, "Ranged Interrupt");
        let lengths: Vec<usize> = report.entries.iter().map(|e| e.original.len()).collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(report.patterns.len(), 1);
        assert_eq!(report.patterns[0].abbreviation, "Dynamic replacement");
    }

    #[test]
    fn test_report_table_layout() {
        let table = abbreviation_report().to_table();
        assert_eq!(table[0], ["Original".to_string(), "Abbreviation".to_string()]);
        assert_eq!(table.len(), 1 + ABBREVIATIONS.len() + 2 + 1);
        assert_eq!(table[ABBREVIATIONS.len() + 2][0], "Pattern-Based Replacements");
    }
}
