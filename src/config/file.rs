//! Config-file layer.
//!
//! The file layer is one flat document named `config.json` (or
//! `config.toml`) in the working directory. Parsing goes through a format
//! driver picked by extension. An absent file contributes nothing; a file
//! that exists but fails to parse aborts resolution.

use crate::config::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw value read from a config file, before type coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValue {
    Str(String),
    Int(i64),
    /// Any other shape, kept as display text for the coercion error.
    Other(String),
}

trait FormatDriver {
    fn file_name(&self) -> &'static str;
    fn parse(&self, raw: &str) -> std::result::Result<BTreeMap<String, FileValue>, String>;
}

struct JsonDriver;

impl FormatDriver for JsonDriver {
    fn file_name(&self) -> &'static str {
        "config.json"
    }

    fn parse(&self, raw: &str) -> std::result::Result<BTreeMap<String, FileValue>, String> {
        let doc: serde_json::Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        let serde_json::Value::Object(map) = doc else {
            return Err("top-level value must be an object".to_string());
        };
        Ok(map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => FileValue::Str(s),
                    serde_json::Value::Number(n) => match n.as_i64() {
                        Some(i) => FileValue::Int(i),
                        None => FileValue::Other(n.to_string()),
                    },
                    other => FileValue::Other(other.to_string()),
                };
                (key, value)
            })
            .collect())
    }
}

struct TomlDriver;

impl FormatDriver for TomlDriver {
    fn file_name(&self) -> &'static str {
        "config.toml"
    }

    fn parse(&self, raw: &str) -> std::result::Result<BTreeMap<String, FileValue>, String> {
        let doc: toml::Value = toml::from_str(raw).map_err(|e| e.to_string())?;
        let toml::Value::Table(table) = doc else {
            return Err("top-level value must be a table".to_string());
        };
        Ok(table
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => FileValue::Str(s),
                    toml::Value::Integer(i) => FileValue::Int(i),
                    other => FileValue::Other(other.to_string()),
                };
                (key, value)
            })
            .collect())
    }
}

// config.json is consulted first, matching the primary on-disk format.
const DRIVERS: [&dyn FormatDriver; 2] = [&JsonDriver, &TomlDriver];

fn driver_for(path: &Path) -> &'static dyn FormatDriver {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => &TomlDriver,
        _ => &JsonDriver,
    }
}

/// Entries loaded from the config file. Empty when no file exists.
#[derive(Debug, Default)]
pub struct FileLayer {
    entries: BTreeMap<String, FileValue>,
    path: Option<PathBuf>,
}

impl FileLayer {
    /// Load from an explicit path. An absent file is an empty layer, not
    /// an error; unknown keys are kept and simply never probed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file present, skipping file layer");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let entries = driver_for(path).parse(&raw).map_err(|reason| ConfigError::ConfigFile {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(Self { entries, path: Some(path.to_path_buf()) })
    }

    /// Discover a config file in `dir`, trying each driver's file name in
    /// order.
    pub fn discover(dir: &Path) -> Result<Self> {
        for driver in DRIVERS {
            let candidate = dir.join(driver.file_name());
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        tracing::debug!(dir = %dir.display(), "no config file discovered");
        Ok(Self::default())
    }

    pub fn get(&self, key: &str) -> Option<&FileValue> {
        self.entries.get(key)
    }

    /// Path the layer was loaded from, when a file was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
