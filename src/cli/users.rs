//! `users` subcommand group.
//!
//! Each leaf owns a scoped `--api-key` option resolved through its own
//! registry, so sibling commands never share a binding table.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;

use crate::config::{resolve, CliValues, EnvMap, OptionRegistry};
use crate::domain::{ApiConfig, AppConfig};

#[derive(Subcommand)]
pub enum UsersCommand {
    /// Create a user
    Create(CreateArgs),
    /// List users
    List(ListArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// The API key
    #[arg(short = 'k', long, value_name = "KEY")]
    api_key: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// The API key
    #[arg(short = 'k', long, value_name = "KEY")]
    api_key: Option<String>,
}

pub fn run(
    command: UsersCommand,
    app: &AppConfig,
    env: &EnvMap,
    config_path: Option<&Path>,
) -> Result<()> {
    match command {
        UsersCommand::Create(args) => create(args, app, env, config_path),
        UsersCommand::List(args) => list(args, app, env, config_path),
    }
}

fn create(args: CreateArgs, app: &AppConfig, env: &EnvMap, config_path: Option<&Path>) -> Result<()> {
    let api = resolve_api(args.api_key.as_deref(), env, config_path)?;
    tracing::debug!(host = %app.mysql_host, database = %app.mysql_database, "creating user");
    println!("Create user: {api:?}");
    Ok(())
}

fn list(args: ListArgs, app: &AppConfig, env: &EnvMap, config_path: Option<&Path>) -> Result<()> {
    let api = resolve_api(args.api_key.as_deref(), env, config_path)?;
    tracing::debug!(host = %app.mysql_host, database = %app.mysql_database, "listing users");
    println!("Listing users: {api:?}");
    Ok(())
}

fn resolve_api(api_key: Option<&str>, env: &EnvMap, config_path: Option<&Path>) -> Result<ApiConfig> {
    let registry = OptionRegistry::api()?;
    let cli = CliValues::new().set_opt("api_key", api_key);
    let snapshot = resolve(&registry, &cli, env, config_path)?;
    Ok(ApiConfig::from_snapshot(&snapshot))
}
