// This file is part of the product Inklet.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MAX_WORKERS: u16 = 32;
const MAX_DB_CONNECTIONS: u32 = 64;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: u16,
}

fn default_workers() -> u16 {
    4
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_file")]
    pub file: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file: default_database_file(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_file() -> String {
    "inklet.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl ValidatedConfig {
    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("config.yaml");
        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        let config: Config = serde_yaml::from_str(&config_content).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Loads and validates configuration at startup. If validation fails, the application should not start.
    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        let config = Self::load(root)?;

        if config.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must not be 0".to_string(),
            ));
        }
        if config.server.workers == 0 || config.server.workers > MAX_WORKERS {
            return Err(ConfigError::ValidationError(format!(
                "Server workers must be between 1 and {}, got: {}",
                MAX_WORKERS, config.server.workers
            )));
        }
        if config.database.max_connections == 0
            || config.database.max_connections > MAX_DB_CONNECTIONS
        {
            return Err(ConfigError::ValidationError(format!(
                "Database max_connections must be between 1 and {}, got: {}",
                MAX_DB_CONNECTIONS, config.database.max_connections
            )));
        }
        if config.database.file.is_empty() || config.database.file.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "Database file must be a plain file name, got: '{}'",
                config.database.file
            )));
        }
        Self::validate_logging(&config.logging)?;
        if config.app.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "App name must not be empty".to_string(),
            ));
        }

        Ok(ValidatedConfig {
            server: config.server,
            app: config.app,
            database: config.database,
            logging: config.logging,
        })
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        match logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationError(format!(
                "Logging level must be one of trace, debug, info, warn, error; got: '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, yaml: &str) {
        fs::write(dir.join("config.yaml"), yaml).expect("write config");
    }

    const VALID_CONFIG: &str = r#"server:
  host: "127.0.0.1"
  port: 8080
  workers: 2

app:
  name: "Inklet"
  description: "Test instance"

database:
  file: "blog.db"
  max_connections: 4

logging:
  level: "debug"
"#;

    #[test]
    fn valid_config_passes_validation() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_config(temp.path(), VALID_CONFIG);

        let config = Config::load_and_validate(temp.path()).expect("validate");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.workers, 2);
        assert_eq!(config.app.name, "Inklet");
        assert_eq!(config.database.file, "blog.db");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn database_and_logging_sections_are_optional() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_config(
            temp.path(),
            "server:\n  host: \"127.0.0.1\"\n  port: 8080\n\napp:\n  name: \"Inklet\"\n  description: \"Defaults\"\n",
        );

        let config = Config::load_and_validate(temp.path()).expect("validate");
        assert_eq!(config.database.file, "inklet.db");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.workers, 4);
    }

    #[test]
    fn zero_port_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_config(
            temp.path(),
            "server:\n  host: \"127.0.0.1\"\n  port: 0\n\napp:\n  name: \"Inklet\"\n  description: \"x\"\n",
        );

        let err = Config::load_and_validate(temp.path()).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn unknown_log_level_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_config(
            temp.path(),
            "server:\n  host: \"127.0.0.1\"\n  port: 8080\n\napp:\n  name: \"Inklet\"\n  description: \"x\"\n\nlogging:\n  level: \"verbose\"\n",
        );

        let err = Config::load_and_validate(temp.path()).unwrap_err();
        assert!(err.to_string().contains("Logging level"));
    }

    #[test]
    fn database_file_with_path_separator_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_config(
            temp.path(),
            "server:\n  host: \"127.0.0.1\"\n  port: 8080\n\napp:\n  name: \"Inklet\"\n  description: \"x\"\n\ndatabase:\n  file: \"../escape.db\"\n",
        );

        let err = Config::load_and_validate(temp.path()).unwrap_err();
        assert!(err.to_string().contains("plain file name"));
    }
}
