//! Browser origins allowed to call the API.
//!
//! # Environment Variables
//!
//! - `ALLOWED_ORIGINS`: Comma-separated origins (default: the local admin
//!   dashboard and the rider/driver app dev servers)

use std::env;

/// Admin dashboard (Vite) and the Expo dev server used by the mobile apps.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:8081";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());
        Self::parse(&raw)
    }

    /// Splits a comma-separated origin list. Browsers send `Origin` without a
    /// trailing slash, so one is stripped from each entry.
    pub fn parse(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self { allowed_origins }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::parse(DEFAULT_ALLOWED_ORIGINS)
    }
}
