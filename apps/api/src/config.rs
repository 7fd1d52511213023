//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum database pool connections
    pub db_max_connections: u32,

    /// JWT secret key for verifying bearer tokens
    pub jwt_secret: String,

    /// How often the outbox dispatcher polls for pending events, in seconds
    pub outbox_poll_interval_secs: u64,

    /// How many pending events the dispatcher claims per poll
    pub outbox_batch_size: i64,

    /// Delivery attempts before an event is parked with its last error
    pub outbox_max_attempts: i32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_port: env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/trackside".to_string()),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production, this MUST be set via environment variable
                "trackside-dev-secret-change-in-production".to_string()
            }),

            outbox_poll_interval_secs: env::var("OUTBOX_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("OUTBOX_POLL_INTERVAL_SECS".to_string()))?,

            outbox_batch_size: env::var("OUTBOX_BATCH_SIZE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("OUTBOX_BATCH_SIZE".to_string()))?,

            outbox_max_attempts: env::var("OUTBOX_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("OUTBOX_MAX_ATTEMPTS".to_string()))?,
        };

        if config.outbox_batch_size <= 0 {
            return Err(ConfigError::InvalidValue("OUTBOX_BATCH_SIZE".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests run in the same process, so everything that mutates the
    // environment lives in a single test to avoid interleaving.

    #[test]
    fn test_load_defaults_and_rejects_bad_values() {
        for var in [
            "PORT",
            "DATABASE_URL",
            "DB_MAX_CONNECTIONS",
            "JWT_SECRET",
            "OUTBOX_POLL_INTERVAL_SECS",
            "OUTBOX_BATCH_SIZE",
            "OUTBOX_MAX_ATTEMPTS",
        ] {
            env::remove_var(var);
        }

        let config = ApiConfig::load().unwrap();
        assert_eq!(config.http_port, 5001);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.outbox_poll_interval_secs, 5);
        assert_eq!(config.outbox_batch_size, 50);
        assert_eq!(config.outbox_max_attempts, 5);

        env::set_var("PORT", "not-a-port");
        let result = ApiConfig::load();
        env::remove_var("PORT");
        assert!(matches!(result, Err(ConfigError::InvalidValue(v)) if v == "PORT"));

        env::set_var("OUTBOX_BATCH_SIZE", "0");
        let result = ApiConfig::load();
        env::remove_var("OUTBOX_BATCH_SIZE");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue(v)) if v == "OUTBOX_BATCH_SIZE"
        ));
    }
}
