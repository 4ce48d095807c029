//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! `config/default.toml`, an environment overlay, and `BETTERQR__*`
//! environment variables. Each sub-module represents a logical section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::{AuthConfig, MIN_COOKIE_SECRET_LEN};
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::session::{MAX_LIFETIME_SECONDS, SessionConfig};

use crate::error::AppError;
use crate::logging::is_valid_level;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cookie and captcha settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `BETTERQR__`, then validates
    /// the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BETTERQR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the application cannot start with.
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_valid_level(&self.logging.level) {
            return Err(AppError::configuration(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(AppError::configuration(format!(
                "Invalid log format: {}",
                self.logging.format
            )));
        }
        if self.auth.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(AppError::configuration(format!(
                "auth.cookie_secret must be at least {MIN_COOKIE_SECRET_LEN} bytes"
            )));
        }
        for (name, value) in [
            ("session.max_age_seconds", self.session.max_age_seconds),
            (
                "session.revoked_retention_seconds",
                self.session.revoked_retention_seconds,
            ),
        ] {
            if value == 0 || value > MAX_LIFETIME_SECONDS {
                return Err(AppError::configuration(format!(
                    "{name} must be between 1 and {MAX_LIFETIME_SECONDS}"
                )));
            }
        }
        if self.session.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "session.sweep_interval_seconds must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 55444);
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.session.max_age_seconds, 2_592_000);
        assert_eq!(config.session.revoked_retention_seconds, 2_592_000);
        assert_eq!(
            config.auth.captcha.verify_url,
            "https://www.google.com/recaptcha/api/siteverify"
        );
    }

    #[test]
    fn test_rejects_unknown_level() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".into();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_rejects_short_cookie_secret() {
        let mut config = AppConfig::default();
        config.auth.cookie_secret = "too-short".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_lifetimes() {
        let mut config = AppConfig::default();
        config.session.max_age_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.session.max_age_seconds = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.session.revoked_retention_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.session.revoked_retention_seconds = MAX_LIFETIME_SECONDS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("revoked_retention_seconds"));

        let mut config = AppConfig::default();
        config.session.revoked_retention_seconds = MAX_LIFETIME_SECONDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server": {"port": 8080}}"#).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.sweep_interval_seconds, 60);
    }
}
