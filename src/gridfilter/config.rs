//! # Configuration
//!
//! Stored as `config.json` in the data directory. Missing keys fall back to
//! their defaults, and a missing file means all defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `default_directory` | `/` | Directory recorded on new filters |
//! | `default_equipment_type` | `GENERATOR` | Equipment type of new filters |
//! | `pretty_json` | `true` | Indent `filters.json` |

use crate::catalog::EquipmentType;
use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

pub const CONFIG_KEYS: &[&str] = &["default_directory", "default_equipment_type", "pretty_json"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridFilterConfig {
    #[serde(default = "default_directory")]
    pub default_directory: String,

    #[serde(default = "default_equipment_type")]
    pub default_equipment_type: EquipmentType,

    #[serde(default = "default_pretty_json")]
    pub pretty_json: bool,
}

fn default_directory() -> String {
    "/".to_string()
}

fn default_equipment_type() -> EquipmentType {
    EquipmentType::Generator
}

fn default_pretty_json() -> bool {
    true
}

impl Default for GridFilterConfig {
    fn default() -> Self {
        Self {
            default_directory: default_directory(),
            default_equipment_type: default_equipment_type(),
            pretty_json: default_pretty_json(),
        }
    }
}

impl GridFilterConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FilterError::Io)?;
        let config: GridFilterConfig =
            serde_json::from_str(&content).map_err(FilterError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FilterError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FilterError::Serialization)?;
        fs::write(config_path, content).map_err(FilterError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_directory" => Some(self.default_directory.clone()),
            "default_equipment_type" => Some(self.default_equipment_type.to_string()),
            "pretty_json" => Some(self.pretty_json.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "default_directory" => {
                self.default_directory = normalize_directory(value);
                Ok(())
            }
            "default_equipment_type" => {
                self.default_equipment_type = value.parse()?;
                Ok(())
            }
            "pretty_json" => {
                self.pretty_json = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(format!("Invalid boolean: {}", value)),
                };
                Ok(())
            }
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }
}

/// Directories are absolute, slash-separated labels.
fn normalize_directory(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}
