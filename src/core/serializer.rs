//! Renders sections as the addon's `TWRA_ImportString` table literal

use crate::types::{FieldKeys, Section};
use std::fmt::Write;

/// Opening of every import string
pub const WRAPPER_OPEN: &str = "TWRA_ImportString={[\"data\"]={";
/// Closing of every import string
pub const WRAPPER_CLOSE: &str = "}}";

/// Table literal writer
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    keys: FieldKeys,
}

impl Serializer {
    pub fn new(keys: FieldKeys) -> Self {
        Self { keys }
    }

    /// Serialize sections in order, numbering them from 1
    pub fn serialize(&self, sections: &[Section]) -> String {
        let mut out = String::with_capacity(64 + sections.len() * 256);
        out.push_str(WRAPPER_OPEN);

        for (index, section) in sections.iter().enumerate() {
            // Writing to a String cannot fail
            let _ = write!(out, "[{}]={{", index + 1);
            let _ = write!(
                out,
                "[\"{}\"]=\"{}\",",
                self.keys.name,
                escape_string(&section.name)
            );

            let _ = write!(out, "[\"{}\"]={{", self.keys.header);
            for (h, token) in section.header.iter().enumerate() {
                let _ = write!(out, "[{}]=\"{}\",", h + 1, escape_string(token));
            }
            out.push_str("},");

            let _ = write!(out, "[\"{}\"]={{", self.keys.rows);
            for (r, row) in section.rows.iter().enumerate() {
                let _ = write!(out, "[{}]={{", r + 1);
                for (col, value) in row.iter() {
                    let _ = write!(out, "[{}]=\"{}\",", col, escape_string(value));
                }
                out.push_str("},");
            }
            out.push_str("},");
            out.push_str("},");
        }

        out.push_str(WRAPPER_CLOSE);
        out
    }
}

/// Escape for a double-quoted table string.
///
/// Backslash goes first so the later replacements are not escaped twice.
pub fn escape_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Inverse of [`escape_string`]. Unknown escapes are kept verbatim.
pub fn unescape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;
    use pretty_assertions::assert_eq;

    fn section() -> Section {
        let mut row = Row::new();
        row.insert(1, "8");
        row.insert(3, "W");
        row.insert(2, "Boss");
        Section {
            name: "Ragnaros".to_string(),
            header: vec!["Icon".to_string(), "Target".to_string(), "T".to_string()],
            rows: vec![row],
        }
    }

    #[test]
    fn test_empty_output() {
        let out = Serializer::new(FieldKeys::SHORT).serialize(&[]);
        assert_eq!(out, "TWRA_ImportString={[\"data\"]={}}");
    }

    #[test]
    fn test_short_keys() {
        let out = Serializer::new(FieldKeys::SHORT).serialize(&[section()]);
        assert_eq!(
            out,
            "TWRA_ImportString={[\"data\"]={[1]={[\"sn\"]=\"Ragnaros\",\
             [\"sh\"]={[1]=\"Icon\",[2]=\"Target\",[3]=\"T\",},\
             [\"sr\"]={[1]={[1]=\"8\",[2]=\"Boss\",[3]=\"W\",},},},}}"
        );
    }

    #[test]
    fn test_long_keys() {
        let out = Serializer::new(FieldKeys::LONG).serialize(&[section()]);
        assert!(out.contains("[\"Section Name\"]=\"Ragnaros\""));
        assert!(out.contains("[\"Section Header\"]={"));
        assert!(out.contains("[\"Section Rows\"]={"));
        assert!(!out.contains("[\"sn\"]"));
    }

    #[test]
    fn test_sections_numbered_contiguously() {
        let out = Serializer::new(FieldKeys::SHORT).serialize(&[section(), section(), section()]);
        assert!(out.contains("{[1]={[\"sn\"]"));
        assert!(out.contains("},[2]={[\"sn\"]"));
        assert!(out.contains("},[3]={[\"sn\"]"));
        assert!(!out.contains("[4]={[\"sn\"]"));
    }

    #[test]
    fn test_escape_order() {
        assert_eq!(escape_string("a\\b"), "a\\\\b");
        assert_eq!(escape_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string("l1\nl2\r\tx"), "l1\\nl2\\r\\tx");
        // A quote after a backslash must not share the backslash
        assert_eq!(escape_string("\\\""), "\\\\\\\"");
        assert_eq!(escape_string(""), "");
    }

    #[test]
    fn test_escape_round_trip() {
        let original = "C:\\raid \"plan\"\nline\r\tend\\n";
        assert_eq!(unescape_string(&escape_string(original)), original);
    }

    #[test]
    fn test_escaped_name_in_output() {
        let mut s = section();
        s.name = "Onyxia's \"Lair\"".to_string();
        let out = Serializer::new(FieldKeys::SHORT).serialize(&[s]);
        assert!(out.contains("[\"sn\"]=\"Onyxia's \\\"Lair\\\"\""));
    }
}
