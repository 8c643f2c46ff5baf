//! Single-pass merge of CLI, environment, file, and default layers.
//!
//! For each registered spec the sources are probed highest-precedence
//! first (flag, then environment, then config file, then the registered
//! default) and the first hit is coerced to the spec's declared kind.
//! Any failure aborts the whole resolution; a partial snapshot is never
//! returned.

use crate::config::error::{ConfigError, Result};
use crate::config::file::{FileLayer, FileValue};
use crate::config::registry::{OptionRegistry, OptionSpec, OptionValue, ValueKind};
use crate::config::snapshot::{ConfigSnapshot, ResolvedValue, Source};
use std::collections::BTreeMap;
use std::path::Path;

/// Flag values that were explicitly present on the command line, keyed by
/// canonical option key. Built by the CLI layer; a key is absent here
/// exactly when its flag was absent from argv.
#[derive(Debug, Clone, Default)]
pub struct CliValues {
    values: BTreeMap<String, String>,
}

impl CliValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an explicit flag value.
    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Record the value only when the flag was present.
    pub fn set_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Environment snapshot handed to [`resolve`].
pub type EnvMap = BTreeMap<String, String>;

/// Snapshot of the process environment. Non-unicode entries are skipped.
pub fn process_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Resolve every spec in `registry` into an immutable snapshot.
///
/// `config_path` selects an explicit config file; `None` discovers one in
/// the working directory. The file is read to completion inside this call
/// and no handle outlives it.
pub fn resolve(
    registry: &OptionRegistry,
    cli: &CliValues,
    env: &EnvMap,
    config_path: Option<&Path>,
) -> Result<ConfigSnapshot> {
    let file = match config_path {
        Some(path) => FileLayer::load(path)?,
        None => FileLayer::discover(Path::new("."))?,
    };

    let mut entries = Vec::with_capacity(registry.len());
    for spec in registry.specs() {
        entries.push((spec.key().to_string(), resolve_one(spec, cli, env, &file)?));
    }
    Ok(ConfigSnapshot::from_entries(entries))
}

fn resolve_one(
    spec: &OptionSpec,
    cli: &CliValues,
    env: &EnvMap,
    file: &FileLayer,
) -> Result<ResolvedValue> {
    if let Some(raw) = cli.get(spec.key()) {
        return Ok(ResolvedValue { value: coerce_str(spec, raw)?, source: Source::CliFlag });
    }
    // a set-but-empty env var counts as unset
    if let Some(raw) = env.get(spec.env_var()).filter(|value| !value.is_empty()) {
        return Ok(ResolvedValue { value: coerce_str(spec, raw)?, source: Source::EnvVar });
    }
    if let Some(raw) = file.get(spec.key()) {
        return Ok(ResolvedValue { value: coerce_file(spec, raw)?, source: Source::ConfigFile });
    }
    Ok(ResolvedValue { value: spec.default().clone(), source: Source::Default })
}

fn coerce_str(spec: &OptionSpec, raw: &str) -> Result<OptionValue> {
    match spec.kind() {
        ValueKind::Str => Ok(OptionValue::Str(raw.to_string())),
        ValueKind::U16 => raw
            .parse::<u16>()
            .map(OptionValue::U16)
            .map_err(|_| coercion_error(spec, raw)),
    }
}

fn coerce_file(spec: &OptionSpec, raw: &FileValue) -> Result<OptionValue> {
    match (spec.kind(), raw) {
        (ValueKind::Str, FileValue::Str(s)) => Ok(OptionValue::Str(s.clone())),
        (ValueKind::U16, FileValue::Int(i)) => u16::try_from(*i)
            .map(OptionValue::U16)
            .map_err(|_| coercion_error(spec, &i.to_string())),
        // digit strings are accepted for numeric keys, same as env values
        (ValueKind::U16, FileValue::Str(s)) => {
            s.parse::<u16>().map(OptionValue::U16).map_err(|_| coercion_error(spec, s))
        }
        (ValueKind::Str, FileValue::Int(i)) => Err(coercion_error(spec, &i.to_string())),
        (_, FileValue::Other(text)) => Err(coercion_error(spec, text)),
    }
}

fn coercion_error(spec: &OptionSpec, raw: &str) -> ConfigError {
    ConfigError::TypeCoercion {
        key: spec.key().to_string(),
        raw: raw.to_string(),
        expected: spec.kind().name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> OptionRegistry {
        let mut registry = OptionRegistry::new();
        registry
            .register(OptionSpec::new("mysql_host", OptionValue::Str(String::new())))
            .expect("register mysql_host");
        registry
            .register(OptionSpec::new("mysql_port", OptionValue::U16(3306)))
            .expect("register mysql_port");
        registry
            .register(OptionSpec::new("jwt_key", OptionValue::Str(String::new())))
            .expect("register jwt_key");
        registry
    }

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn no_file(tmp: &TempDir) -> std::path::PathBuf {
        tmp.path().join("config.json")
    }

    #[test]
    fn defaults_apply_when_no_source_supplies_a_key() {
        let tmp = TempDir::new().expect("tmp");
        let snapshot =
            resolve(&registry(), &CliValues::new(), &EnvMap::new(), Some(&no_file(&tmp)))
                .expect("snapshot");

        assert_eq!(snapshot.get_str("mysql_host"), Some(""));
        assert_eq!(snapshot.get_u16("mysql_port"), Some(3306));
        assert_eq!(snapshot.source("mysql_port"), Some(Source::Default));
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn flag_wins_over_env_and_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"mysql_port": 1111}"#).expect("write");

        let cli = CliValues::new().set("mysql_port", "9999");
        let env = env(&[("MYSQL_PORT", "5432")]);
        let snapshot = resolve(&registry(), &cli, &env, Some(&path)).expect("snapshot");

        assert_eq!(snapshot.get_u16("mysql_port"), Some(9999));
        assert_eq!(snapshot.source("mysql_port"), Some(Source::CliFlag));
    }

    #[test]
    fn env_wins_over_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"mysql_port": 1111}"#).expect("write");

        let env = env(&[("MYSQL_PORT", "5432")]);
        let snapshot = resolve(&registry(), &CliValues::new(), &env, Some(&path))
            .expect("snapshot");

        assert_eq!(snapshot.get_u16("mysql_port"), Some(5432));
        assert_eq!(snapshot.source("mysql_port"), Some(Source::EnvVar));
    }

    #[test]
    fn file_wins_over_default() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"jwt_key": "abc123"}"#).expect("write");

        let snapshot = resolve(&registry(), &CliValues::new(), &EnvMap::new(), Some(&path))
            .expect("snapshot");

        assert_eq!(snapshot.get_str("jwt_key"), Some("abc123"));
        assert_eq!(snapshot.source("jwt_key"), Some(Source::ConfigFile));
    }

    #[test]
    fn env_value_alone_resolves() {
        let tmp = TempDir::new().expect("tmp");
        let env = env(&[("MYSQL_PORT", "5432")]);
        let snapshot = resolve(&registry(), &CliValues::new(), &env, Some(&no_file(&tmp)))
            .expect("snapshot");

        assert_eq!(snapshot.get_u16("mysql_port"), Some(5432));
    }

    #[test]
    fn empty_env_var_counts_as_unset() {
        let tmp = TempDir::new().expect("tmp");
        let env = env(&[("MYSQL_HOST", "")]);
        let snapshot = resolve(&registry(), &CliValues::new(), &env, Some(&no_file(&tmp)))
            .expect("snapshot");

        assert_eq!(snapshot.get_str("mysql_host"), Some(""));
        assert_eq!(snapshot.source("mysql_host"), Some(Source::Default));
    }

    #[test]
    fn non_numeric_flag_value_names_the_key() {
        let tmp = TempDir::new().expect("tmp");
        let cli = CliValues::new().set("mysql_port", "not-a-number");
        let err = resolve(&registry(), &cli, &EnvMap::new(), Some(&no_file(&tmp)))
            .expect_err("coercion must fail");

        match err {
            ConfigError::TypeCoercion { key, raw, .. } => {
                assert_eq!(key, "mysql_port");
                assert_eq!(raw, "not-a-number");
            }
            other => panic!("expected TypeCoercion, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_port_fails_instead_of_truncating() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"mysql_port": 70000}"#).expect("write");

        let err = resolve(&registry(), &CliValues::new(), &EnvMap::new(), Some(&path))
            .expect_err("out-of-range must fail");
        assert!(matches!(err, ConfigError::TypeCoercion { ref key, .. } if key == "mysql_port"));
    }

    #[test]
    fn file_digit_string_is_accepted_for_numeric_key() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"mysql_port": "3307"}"#).expect("write");

        let snapshot = resolve(&registry(), &CliValues::new(), &EnvMap::new(), Some(&path))
            .expect("snapshot");
        assert_eq!(snapshot.get_u16("mysql_port"), Some(3307));
    }

    #[test]
    fn file_integer_for_string_key_is_a_coercion_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"mysql_host": 42}"#).expect("write");

        let err = resolve(&registry(), &CliValues::new(), &EnvMap::new(), Some(&path))
            .expect_err("wrong shape must fail");
        assert!(matches!(err, ConfigError::TypeCoercion { ref key, .. } if key == "mysql_host"));
    }

    #[test]
    fn malformed_file_aborts_resolution() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, "{not json").expect("write");

        let err = resolve(&registry(), &CliValues::new(), &EnvMap::new(), Some(&path))
            .expect_err("parse failure must abort");
        assert!(matches!(err, ConfigError::ConfigFile { .. }));
    }

    #[test]
    fn unknown_file_keys_are_ignored() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"jwt_key": "abc123", "unrelated": "x"}"#).expect("write");

        let snapshot = resolve(&registry(), &CliValues::new(), &EnvMap::new(), Some(&path))
            .expect("snapshot");
        assert_eq!(snapshot.get_str("jwt_key"), Some("abc123"));
        assert_eq!(snapshot.get("unrelated"), None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"mysql_host": "db.internal"}"#).expect("write");

        let registry = registry();
        let cli = CliValues::new().set("mysql_port", "9999");
        let env = env(&[("JWT_KEY", "abc123")]);

        let first = resolve(&registry, &cli, &env, Some(&path)).expect("first snapshot");
        let second = resolve(&registry, &cli, &env, Some(&path)).expect("second snapshot");
        assert_eq!(first, second);
    }
}
