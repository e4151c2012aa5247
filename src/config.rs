//! Configuration: default output options and raid presets
//!
//! An optional YAML file can override the defaults and add presets:
//!
//! ```yaml
//! prefer_short_keys: true
//! use_abbreviations: true
//! presets:
//!   Naxxramas Full Instance:
//!     - Spider Wing
//!     - Plague Wing
//! ```

use crate::error::{TwraError, TwraResult};
use crate::types::ExportOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Raid presets shipped with the tool: name → sheets
const BUILTIN_PRESETS: &[(&str, &[&str])] = &[
    ("Tower of Karazhan", &["Tower of Karazhan"]),
    (
        "Naxxramas Full Instance",
        &[
            "Spider Wing",
            "Plague Wing",
            "Abomination Wing",
            "Military Wing",
            "Frostwyrm's Lair",
        ],
    ),
    ("Naxxramas Spider Wing", &["Spider Wing"]),
    ("Naxxramas Abomination Wing", &["Abomination Wing"]),
    ("Naxxramas Military Wing", &["Military Wing"]),
    ("Naxxramas Plague Wing", &["Plague Wing"]),
    ("Naxxramas Frostwyrm's Lair", &["Frostwyrm's Lair"]),
    ("Temple of Ahn'Qiraj", &["Temple of Ahn'Qiraj"]),
    ("Blackwing Lair", &["Blackwing Lair"]),
    ("Molten Core", &["Molten Core"]),
    ("Ruins of Ahn'Qiraj", &["Ruins of Ahn'Qiraj"]),
    ("Onyxia's Lair", &["Onyxia's Lair"]),
    ("Zul'Gurub", &["Zul'Gurub"]),
    ("Lower Karazhan Halls", &["Lower Karazhan Halls"]),
    ("Upper Blackrock Spire", &["Upper Blackrock Spire"]),
];

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub options: ExportOptions,
    pub presets: BTreeMap<String, Vec<String>>,
}

/// On-disk shape; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    prefer_short_keys: Option<bool>,
    use_abbreviations: Option<bool>,
    #[serde(default)]
    presets: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            options: ExportOptions::default(),
            presets: BUILTIN_PRESETS
                .iter()
                .map(|(name, sheets)| {
                    (
                        (*name).to_string(),
                        sheets.iter().map(|s| (*s).to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl Config {
    /// Load from a YAML file, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> TwraResult<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    TwraError::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_yaml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse YAML on top of the defaults; file presets replace built-ins of the same name
    pub fn from_yaml(content: &str) -> TwraResult<Self> {
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(content)?
        };

        let mut config = Self::default();
        if let Some(short) = file.prefer_short_keys {
            config.options.prefer_short_keys = short;
        }
        if let Some(abbreviate) = file.use_abbreviations {
            config.options.use_abbreviations = abbreviate;
        }

        for (name, sheets) in file.presets {
            if sheets.is_empty() {
                return Err(TwraError::Config(format!(
                    "Preset '{}' does not list any sheets",
                    name
                )));
            }
            // Drop a built-in that differs only in case
            config.presets.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            config.presets.insert(name, sheets);
        }

        Ok(config)
    }

    /// Case-insensitive preset lookup
    pub fn preset(&self, name: &str) -> Option<(&str, &[String])> {
        self.presets
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name.trim()))
            .map(|(preset, sheets)| (preset.as_str(), sheets.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.options.prefer_short_keys);
        assert!(config.options.use_abbreviations);
        assert_eq!(config.presets.len(), BUILTIN_PRESETS.len());
    }

    #[test]
    fn test_builtin_naxx_preset() {
        let config = Config::default();
        let (name, sheets) = config.preset("naxxramas full instance").unwrap();
        assert_eq!(name, "Naxxramas Full Instance");
        assert_eq!(sheets.len(), 5);
        assert_eq!(sheets[4], "Frostwyrm's Lair");
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Config::default().preset("Icecrown Citadel").is_none());
    }

    #[test]
    fn test_from_yaml_overrides() {
        let yaml = r#"
prefer_short_keys: true
use_abbreviations: false
presets:
  molten core:
    - MC Trash
    - MC Bosses
  Guild Night:
    - Molten Core
    - Onyxia's Lair
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.options.prefer_short_keys);
        assert!(!config.options.use_abbreviations);
        let (name, sheets) = config.preset("Molten Core").unwrap();
        assert_eq!(name, "molten core");
        assert_eq!(sheets, &["MC Trash".to_string(), "MC Bosses".to_string()]);
        assert!(config.preset("guild night").is_some());
        assert_eq!(config.presets.len(), BUILTIN_PRESETS.len() + 1);
    }

    #[test]
    fn test_from_yaml_empty() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_from_yaml_rejects_empty_preset() {
        let err = Config::from_yaml("presets:\n  Nothing: []\n").unwrap_err();
        assert!(matches!(err, TwraError::Config(_)));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_field() {
        assert!(matches!(
            Config::from_yaml("short_keys: true\n"),
            Err(TwraError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"prefer_short_keys: true\n").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.options.prefer_short_keys);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("no/such/twra.yaml"))).unwrap_err();
        assert!(matches!(err, TwraError::Config(_)));
    }
}
