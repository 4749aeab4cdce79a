//! Environment-driven server configuration.
//!
//! `.env` is loaded by the binary before [`ServerConfig::from_env`] runs, so
//! every key below may come from either the process environment or that file.
//!
//! | Env var                 | Default                 |
//! |-------------------------|-------------------------|
//! | `DATABASE_URL`          | required                |
//! | `HOST`                  | `0.0.0.0`               |
//! | `PORT`                  | `3000`                  |
//! | `CORS_ORIGINS`          | `http://localhost:5173` |
//! | `REQUEST_TIMEOUT_SECS`  | `30`                    |
//! | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
//! | `EXPOSE_ERROR_DETAILS`  | `false`                 |

use std::str::FromStr;

/// Reasons the configuration could not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Upper bound on draining the pool after the listener stops.
    pub shutdown_timeout_secs: u64,
    /// Development mode: 500 responses carry the underlying message in `detail`.
    pub expose_error_details: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let cors_origins = var_or("CORS_ORIGINS", "http://localhost:5173".to_string())?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let expose_error_details = std::env::var("EXPOSE_ERROR_DETAILS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            host: var_or("HOST", "0.0.0.0".to_string())?,
            port: var_or("PORT", 3000)?,
            cors_origins,
            request_timeout_secs: var_or("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: var_or("SHUTDOWN_TIMEOUT_SECS", 30)?,
            expose_error_details,
        })
    }
}

/// Read and parse `key`, falling back to `default` when it is unset.
fn var_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
