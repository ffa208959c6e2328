// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

/// Route eligible for cache revalidation by default.
pub const DEFAULT_REVALIDATE_PATH: &str = "/profile/edit";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL, used for CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Routes whose cached rendering may be revalidated by profile updates.
    /// Matching is exact (case- and slash-sensitive).
    pub revalidate_paths: Vec<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            revalidate_paths: vec![DEFAULT_REVALIDATE_PATH.to_string()],
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `REVALIDATE_PATHS` is a comma-separated list of routes; when unset the
    /// profile-edit route is the only eligible one.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            revalidate_paths: env::var("REVALIDATE_PATHS")
                .map(|raw| parse_revalidate_paths(&raw))
                .unwrap_or_else(|_| vec![DEFAULT_REVALIDATE_PATH.to_string()]),
        })
    }
}

fn parse_revalidate_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
