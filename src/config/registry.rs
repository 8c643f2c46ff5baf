//! Declarative registry of configurable options.
//!
//! Every key the resolver can produce is declared here as an [`OptionSpec`]:
//! canonical snake_case key, CLI flag spellings, environment variable, and
//! typed default. A registry is scoped to one command-tree node — the root
//! command owns the global options and each `users` leaf constructs its own
//! registry — so sibling commands can reuse spellings without overwriting
//! each other's bindings.

use crate::config::error::{ConfigError, Result};

/// Default execution environment when nothing else supplies one.
pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// Default MySQL port.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// A typed option value, either the registered default or a resolved one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Str(String),
    U16(u16),
}

impl OptionValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            OptionValue::Str(_) => ValueKind::Str,
            OptionValue::U16(_) => ValueKind::U16,
        }
    }
}

/// Shape a raw value must coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Str,
    U16,
}

impl ValueKind {
    /// Human-readable name used in coercion error messages.
    pub(crate) fn name(self) -> &'static str {
        match self {
            ValueKind::Str => "a string",
            ValueKind::U16 => "an integer in 0..=65535",
        }
    }
}

/// Static declaration of one configurable setting.
///
/// Flag and env spellings are derived from the key (kebab-case flag,
/// SCREAMING_SNAKE env var) unless overridden with [`OptionSpec::long`] or
/// [`OptionSpec::env`].
#[derive(Debug, Clone)]
pub struct OptionSpec {
    key: String,
    long: String,
    short: Option<char>,
    env_var: String,
    default: OptionValue,
}

impl OptionSpec {
    pub fn new(key: &str, default: OptionValue) -> Self {
        Self {
            key: key.to_string(),
            long: key.replace('_', "-"),
            short: None,
            env_var: key.to_ascii_uppercase(),
            default,
        }
    }

    /// Override the derived long flag spelling.
    pub fn long(mut self, long: &str) -> Self {
        self.long = long.to_string();
        self
    }

    /// Add a single-character flag shorthand.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Override the derived environment variable spelling.
    pub fn env(mut self, var: &str) -> Self {
        self.env_var = var.to_string();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn long_flag(&self) -> &str {
        &self.long
    }

    pub fn shorthand(&self) -> Option<char> {
        self.short
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn default(&self) -> &OptionValue {
        &self.default
    }

    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }
}

/// Ordered collection of option specs owned by one command-tree node.
#[derive(Debug, Default)]
pub struct OptionRegistry {
    specs: Vec<OptionSpec>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec, rejecting duplicate key, flag, or env spellings.
    pub fn register(&mut self, spec: OptionSpec) -> Result<()> {
        for existing in &self.specs {
            let clash = if existing.key == spec.key {
                Some(&spec.key)
            } else if existing.long == spec.long {
                Some(&spec.long)
            } else if existing.env_var == spec.env_var {
                Some(&spec.env_var)
            } else {
                None
            };
            if let Some(spelling) = clash {
                return Err(ConfigError::DuplicateKey {
                    key: spec.key.clone(),
                    spelling: spelling.clone(),
                });
            }
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Specs in registration order, for deterministic resolution.
    pub fn specs(&self) -> impl Iterator<Item = &OptionSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Global options owned by the root command.
    pub fn global() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(
            OptionSpec::new("environment", OptionValue::Str(DEFAULT_ENVIRONMENT.to_string()))
                .short('e'),
        )?;
        registry.register(OptionSpec::new("mysql_host", OptionValue::Str(String::new())))?;
        registry.register(OptionSpec::new("mysql_port", OptionValue::U16(DEFAULT_MYSQL_PORT)))?;
        registry.register(OptionSpec::new("mysql_user", OptionValue::Str(String::new())))?;
        registry.register(OptionSpec::new("mysql_password", OptionValue::Str(String::new())))?;
        registry.register(OptionSpec::new("mysql_database", OptionValue::Str(String::new())))?;
        registry.register(OptionSpec::new("jwt_key", OptionValue::Str(String::new())))?;
        Ok(registry)
    }

    /// Scoped options for a `users` leaf command. Built fresh per
    /// invocation so sibling leaves never share a binding table.
    pub fn api() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(
            OptionSpec::new("api_key", OptionValue::Str(String::new())).short('k'),
        )?;
        Ok(registry)
    }
}
