//! Process-level server configuration.
//!
//! # Environment Variables
//!
//! - `BIND_ADDR`: Listen address (default: `0.0.0.0:3000`)
//! - `STORE_BACKEND`: `memory` or `postgres` (default: `memory`)
//! - `BCRYPT_COST`: bcrypt work factor for new password hashes (default: 12)
//! - `METRICS_ENABLED`: Serve Prometheus metrics at `/metrics` (default: true)

use std::fmt;
use std::str::FromStr;

/// Which user store implementation backs the API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub bcrypt_cost: u32,
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            store_backend: StoreBackend::Memory,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            metrics_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Loads the config from the environment, falling back to defaults for
    /// anything missing or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            store_backend: std::env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store_backend),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|cost| (4..=31).contains(cost))
                .unwrap_or(defaults.bcrypt_cost),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("memory".parse(), Ok(StoreBackend::Memory));
        assert_eq!("Postgres".parse(), Ok(StoreBackend::Postgres));
        assert_eq!(" postgresql ".parse(), Ok(StoreBackend::Postgres));
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_store_backend_display_roundtrip() {
        for backend in [StoreBackend::Memory, StoreBackend::Postgres] {
            assert_eq!(backend.to_string().parse(), Ok(backend));
        }
    }
}
