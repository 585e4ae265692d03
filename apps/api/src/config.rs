//! API configuration module.
//!
//! Configuration is layered, later sources winning:
//!
//! ```text
//! built-in defaults → stockroom.toml (optional) → STOCKROOM_* environment
//! ```
//!
//! `.env` is loaded into the environment first, so it behaves like any other
//! environment variable. `STOCKROOM_JWT_SECRET` has no default.

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use stockroom_core::{CatalogPolicy, CategoryDeletePolicy, ProductDeletePolicy, DEFAULT_TOKEN_ISSUER};
use stockroom_db::DbConfig;

/// Environment variable prefix (`STOCKROOM_PORT`, `STOCKROOM_JWT_SECRET`, ...).
pub const ENV_PREFIX: &str = "STOCKROOM";

/// Name of the optional configuration file, without extension.
pub const CONFIG_FILE: &str = "stockroom";

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Secret key for signing tokens
    #[serde(default)]
    pub jwt_secret: String,

    /// `iss` claim written into and required from every token
    pub jwt_issuer: String,

    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,

    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,

    pub category_delete_policy: CategoryDeletePolicy,

    pub product_delete_policy: ProductDeletePolicy,
}

impl ApiConfig {
    /// Loads `.env`, then the layered configuration.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }

        Self::from_sources(
            Some(File::with_name(CONFIG_FILE).required(false)),
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Builds the configuration from an optional file and an environment
    /// source on top of the defaults.
    pub fn from_sources(
        file: Option<File<config::FileSourceFile, config::FileFormat>>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("database_path", "./stockroom.db")?
            .set_default("max_connections", 5)?
            .set_default("jwt_issuer", DEFAULT_TOKEN_ISSUER)?
            .set_default("jwt_expiry_hours", 24)?
            .set_default("cors_origins", vec!["http://localhost:4200"])?
            .set_default("category_delete_policy", "detach")?
            .set_default("product_delete_policy", "cascade")?;

        if let Some(file) = file {
            builder = builder.add_source(file);
        }

        let config: ApiConfig = builder
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }
        if self.jwt_issuer.trim().is_empty() {
            return Err(ConfigError::InvalidValue("jwt_issuer".to_string()));
        }
        if self.jwt_expiry_hours <= 0 {
            return Err(ConfigError::InvalidValue("jwt_expiry_hours".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        Ok(())
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("host".to_string()))
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone()).max_connections(self.max_connections)
    }

    pub fn catalog_policy(&self) -> CatalogPolicy {
        CatalogPolicy {
            category_delete: self.category_delete_policy,
            product_delete: self.product_delete_policy,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults_with_secret() {
        let config = ApiConfig::from_sources(None, env(&[("STOCKROOM_JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_issuer, "stock");
        assert_eq!(config.jwt_expiry_hours, 24);
        assert_eq!(config.cors_origins, vec!["http://localhost:4200".to_string()]);
        assert_eq!(config.catalog_policy(), CatalogPolicy::default());
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let err = ApiConfig::from_sources(None, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(ref key) if key == "jwt_secret"));
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::from_sources(
            None,
            env(&[
                ("STOCKROOM_JWT_SECRET", "s3cret"),
                ("STOCKROOM_PORT", "8081"),
                ("STOCKROOM_CORS_ORIGINS", "http://a.test,http://b.test"),
                ("STOCKROOM_CATEGORY_DELETE_POLICY", "reject"),
                ("STOCKROOM_PRODUCT_DELETE_POLICY", "retain_history"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.category_delete_policy, CategoryDeletePolicy::Reject);
        assert_eq!(config.product_delete_policy, ProductDeletePolicy::RetainHistory);
    }

    #[test]
    fn test_bind_addr() {
        let mut config = ApiConfig::from_sources(None, env(&[("STOCKROOM_JWT_SECRET", "s")])).unwrap();
        config.host = "127.0.0.1".to_string();
        assert_eq!(config.bind_addr().unwrap().port(), 3000);

        config.host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
    }
}
