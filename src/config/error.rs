//! Error taxonomy for configuration resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a registry or resolving configuration.
///
/// None of these are retried: resolution is fail-fast and the caller
/// surfaces the message and exits non-zero. Missing optional inputs
/// (absent config file, unset env var, unset flag) are not errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Two specs in the same registry share a key, long flag, or env var.
    /// Always a programmer error in registry construction.
    #[error("duplicate option spelling {spelling:?} registered by key {key:?}")]
    DuplicateKey { key: String, spelling: String },

    /// The config file exists but could not be read or parsed.
    #[error("invalid config file {}: {reason}", path.display())]
    ConfigFile { path: PathBuf, reason: String },

    /// A supplied value does not fit the declared option type.
    #[error("invalid value {raw:?} for option {key:?}: expected {expected}")]
    TypeCoercion {
        key: String,
        raw: String,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
