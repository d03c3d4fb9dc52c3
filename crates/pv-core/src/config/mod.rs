//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod database;
pub mod inspection;
pub mod logging;
pub mod mail;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::inspection::InspectionConfig;
pub use self::logging::LoggingConfig;
pub use self::mail::MailConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides
/// (e.g. `PV__DATABASE__URL`).
pub const ENV_PREFIX: &str = "PV";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay) and
/// `PV__`-prefixed environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Outgoing mail settings, handed to the mailer on every send.
    #[serde(default)]
    pub mail: MailConfig,
    /// Inspection-document storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Periodic inspection (VGP) validity rules.
    #[serde(default)]
    pub inspection: InspectionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base file at `path`, an optional `config/{env}` overlay,
    /// and environment variables prefixed with `PV__`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let base = path.trim_end_matches(".toml");
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Build a configuration from an inline TOML document (tests, tooling).
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
