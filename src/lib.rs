//! userctl: manage user objects with layered configuration
//!
//! CLI flags, environment variables, and an on-disk config file are merged
//! into one immutable snapshot per invocation (flag > env > file > default),
//! then threaded explicitly into the command that runs.

pub mod cli;
pub mod config;
pub mod domain;
