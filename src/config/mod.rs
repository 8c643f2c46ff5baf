//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI
//! arguments with proper precedence (CLI > Env > File > Defaults). Every
//! configurable key is declared in an [`OptionRegistry`] scoped to one
//! command-tree node; [`resolve`] merges the layers into one immutable
//! [`ConfigSnapshot`] per invocation.

pub mod error;
pub mod file;
pub mod registry;
pub mod resolver;
pub mod snapshot;

pub use error::{ConfigError, Result};
pub use file::FileLayer;
pub use registry::{
    OptionRegistry, OptionSpec, OptionValue, ValueKind, DEFAULT_ENVIRONMENT, DEFAULT_MYSQL_PORT,
};
pub use resolver::{process_env, resolve, CliValues, EnvMap};
pub use snapshot::{ConfigSnapshot, ResolvedValue, Source};
