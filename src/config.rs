//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/careerconnect/config.toml`)
//! with environment-variable overrides for secrets and the provisioned
//! operator identities. The resulting [`AppConfig`] is built once by the
//! process entry point and threaded through as a parameter; no other
//! module reads the process environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file location: `~/.config/careerconnect/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("careerconnect")
        .join("config.toml")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub bootstrap: BootstrapConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let mut config: AppConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: display,
                source,
            })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a config file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Ok(hours) = std::env::var("JWT_EXPIRATION_HOURS") {
            if let Ok(hours) = hours.parse() {
                self.security.jwt_expiration_hours = hours;
            }
        }

        let overrides = [
            ("SUPER_ADMIN_EMAIL", &mut self.bootstrap.super_admin_email),
            (
                "SUPER_ADMIN_PASSWORD",
                &mut self.bootstrap.super_admin_password,
            ),
            (
                "MANAGEMENT_ADMIN_EMAIL",
                &mut self.bootstrap.management_admin_email,
            ),
            (
                "MANAGEMENT_ADMIN_PASSWORD",
                &mut self.bootstrap.management_admin_password,
            ),
            ("TPO_ADMIN_EMAIL", &mut self.bootstrap.tpo_admin_email),
            (
                "TPO_ADMIN_PASSWORD",
                &mut self.bootstrap.tpo_admin_password,
            ),
        ];
        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                *slot = value;
            }
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 4518,
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        self.url.clone()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./careerconnect.db?mode=rwc".to_string(),
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "super-secret-key-change-in-production".to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

/// Credentials for the three privileged operator accounts provisioned at
/// startup.
///
/// Each password falls back to a fixed per-role literal when neither the
/// config file nor the corresponding environment variable supplies one.
/// An operator who deploys without setting them gets guessable-password
/// admin accounts — change these in any real deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub super_admin_email: String,
    pub super_admin_password: String,
    pub management_admin_email: String,
    pub management_admin_password: String,
    pub tpo_admin_email: String,
    pub tpo_admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            super_admin_email: "superadmin@careerconnect.com".to_string(),
            super_admin_password: "superadmin123".to_string(),
            management_admin_email: "management@careerconnect.com".to_string(),
            management_admin_password: "management123".to_string(),
            tpo_admin_email: "tpoadmin@careerconnect.com".to_string(),
            tpo_admin_password: "tpoadmin123".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter (overridable via `RUST_LOG`).
    pub level: String,
    /// `pretty` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = AppConfig::default();
        assert_eq!(config.server.api_port, 4518);
        assert!(config.database.url.starts_with("sqlite://"));
        assert_eq!(config.security.jwt_expiration_hours, 24);
        assert_eq!(
            config.bootstrap.super_admin_email,
            "superadmin@careerconnect.com"
        );
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let raw = r#"
            [server]
            api_port = 8080

            [bootstrap]
            super_admin_email = "root@campus.edu"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.server.api_port, 8080);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.bootstrap.super_admin_email, "root@campus.edu");
        // untouched identities keep their fallback credentials
        assert_eq!(config.bootstrap.tpo_admin_password, "tpoadmin123");
    }
}
