//! Immutable resolved configuration.

use crate::config::registry::OptionValue;
use std::fmt;

/// Which layer supplied a resolved value. Tracked for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Default,
    ConfigFile,
    EnvVar,
    CliFlag,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Source::Default => "default",
            Source::ConfigFile => "config file",
            Source::EnvVar => "environment",
            Source::CliFlag => "flag",
        };
        f.write_str(label)
    }
}

/// One resolved entry: the typed value plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: OptionValue,
    pub source: Source,
}

/// Immutable mapping from option key to resolved value.
///
/// Produced once per invocation; every registered key has exactly one
/// entry, in registration order. Nothing mutates it after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    entries: Vec<(String, ResolvedValue)>,
}

impl ConfigSnapshot {
    pub(crate) fn from_entries(entries: Vec<(String, ResolvedValue)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn source(&self, key: &str) -> Option<Source> {
        self.get(key).map(|resolved| resolved.source)
    }

    /// String value of `key`, when registered as a string option.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(ResolvedValue { value: OptionValue::Str(s), .. }) => Some(s),
            _ => None,
        }
    }

    /// Integer value of `key`, when registered as a u16 option.
    pub fn get_u16(&self, key: &str) -> Option<u16> {
        match self.get(key) {
            Some(ResolvedValue { value: OptionValue::U16(n), .. }) => Some(*n),
            _ => None,
        }
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
