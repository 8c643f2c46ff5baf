//! Typed views over resolved configuration snapshots.

use crate::config::{ConfigSnapshot, DEFAULT_ENVIRONMENT, DEFAULT_MYSQL_PORT};

/// Application-wide settings owned by the root command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: String,
    pub mysql_host: String,
    pub mysql_port: u16,
    pub mysql_user: String,
    pub mysql_password: String,
    pub mysql_database: String,
    pub jwt_key: String,
}

impl AppConfig {
    /// Build from a snapshot produced by [`crate::config::OptionRegistry::global`].
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
        Self {
            environment: snapshot
                .get_str("environment")
                .unwrap_or(DEFAULT_ENVIRONMENT)
                .to_string(),
            mysql_host: snapshot.get_str("mysql_host").unwrap_or_default().to_string(),
            mysql_port: snapshot.get_u16("mysql_port").unwrap_or(DEFAULT_MYSQL_PORT),
            mysql_user: snapshot.get_str("mysql_user").unwrap_or_default().to_string(),
            mysql_password: snapshot.get_str("mysql_password").unwrap_or_default().to_string(),
            mysql_database: snapshot.get_str("mysql_database").unwrap_or_default().to_string(),
            jwt_key: snapshot.get_str("jwt_key").unwrap_or_default().to_string(),
        }
    }
}

/// Scoped settings for a `users` leaf command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
}

impl ApiConfig {
    /// Build from a snapshot produced by [`crate::config::OptionRegistry::api`].
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
        Self { api_key: snapshot.get_str("api_key").unwrap_or_default().to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, CliValues, EnvMap, OptionRegistry};
    use tempfile::TempDir;

    #[test]
    fn app_config_reflects_the_snapshot() {
        let tmp = TempDir::new().expect("tmp");
        let registry = OptionRegistry::global().expect("registry");
        let cli = CliValues::new()
            .set("mysql_host", "db.internal")
            .set("mysql_port", "3307")
            .set("jwt_key", "abc123");
        let snapshot = resolve(&registry, &cli, &EnvMap::new(), Some(&tmp.path().join("config.json")))
            .expect("snapshot");

        let app = AppConfig::from_snapshot(&snapshot);
        assert_eq!(app.environment, "dev");
        assert_eq!(app.mysql_host, "db.internal");
        assert_eq!(app.mysql_port, 3307);
        assert_eq!(app.jwt_key, "abc123");
        assert_eq!(app.mysql_user, "");
    }

    #[test]
    fn api_config_reflects_the_scoped_snapshot() {
        let tmp = TempDir::new().expect("tmp");
        let registry = OptionRegistry::api().expect("registry");
        let cli = CliValues::new().set("api_key", "s3cr3t");
        let snapshot = resolve(&registry, &cli, &EnvMap::new(), Some(&tmp.path().join("config.json")))
            .expect("snapshot");

        assert_eq!(ApiConfig::from_snapshot(&snapshot), ApiConfig { api_key: "s3cr3t".into() });
    }
}
