//! Command-line interface for userctl
//!
//! The root command resolves and prints the global configuration; the
//! `users` group hosts the per-object subcommands.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod users;

use crate::config::{process_env, resolve, CliValues, ConfigSnapshot, OptionRegistry};
use crate::domain::AppConfig;

/// Manage user objects against a MySQL-backed service
#[derive(Parser)]
#[command(name = "userctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    globals: GlobalArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by every command, resolved through the global registry.
/// Flags stay untyped here; the resolver owns all coercion.
#[derive(Args)]
struct GlobalArgs {
    /// The execution environment for the application. Expected values are
    /// dev for local development and prod for production deployments.
    #[arg(short = 'e', long, global = true, value_name = "ENV")]
    environment: Option<String>,

    /// MySQL database host
    #[arg(long, global = true, value_name = "HOST")]
    mysql_host: Option<String>,

    /// MySQL database port
    #[arg(long, global = true, value_name = "PORT")]
    mysql_port: Option<String>,

    /// MySQL username
    #[arg(long, global = true, value_name = "USER")]
    mysql_user: Option<String>,

    /// MySQL password
    #[arg(long, global = true, value_name = "PASSWORD")]
    mysql_password: Option<String>,

    /// MySQL database name
    #[arg(long, global = true, value_name = "DATABASE")]
    mysql_database: Option<String>,

    /// JWT key in base-64 format
    #[arg(long, global = true, value_name = "KEY")]
    jwt_key: Option<String>,

    /// Path to the config file (defaults to config.json or config.toml in
    /// the working directory)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl GlobalArgs {
    fn cli_values(&self) -> CliValues {
        CliValues::new()
            .set_opt("environment", self.environment.as_deref())
            .set_opt("mysql_host", self.mysql_host.as_deref())
            .set_opt("mysql_port", self.mysql_port.as_deref())
            .set_opt("mysql_user", self.mysql_user.as_deref())
            .set_opt("mysql_password", self.mysql_password.as_deref())
            .set_opt("mysql_database", self.mysql_database.as_deref())
            .set_opt("jwt_key", self.jwt_key.as_deref())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interact with user objects
    Users {
        #[command(subcommand)]
        command: users::UsersCommand,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    // Resolution happens once, up front; everything downstream reads the
    // snapshot (or a typed view of it) passed by value.
    let env = process_env();
    let registry = OptionRegistry::global()?;
    let config_path = cli.globals.config.as_deref();
    let snapshot = resolve(&registry, &cli.globals.cli_values(), &env, config_path)?;
    log_provenance(&snapshot);
    let app = AppConfig::from_snapshot(&snapshot);

    match cli.command {
        None => {
            println!("Parsed configuration: {app:?}");
            Ok(())
        }
        Some(Commands::Users { command }) => users::run(command, &app, &env, config_path),
    }
}

fn log_provenance(snapshot: &ConfigSnapshot) {
    for (key, resolved) in snapshot.iter() {
        tracing::debug!(key, source = %resolved.source, "resolved option");
    }
}
