// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Production backend host.
pub const DEFAULT_API_BASE_URL: &str = "https://mahadevaaya.com/ngoproject/ngoproject_backend";

/// Default token refresh path (SimpleJWT convention).
pub const DEFAULT_TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL without trailing slash
    pub api_base_url: String,
    /// Base URL serving the `-hindi` endpoint variants, if any
    pub hindi_base_url: Option<String>,
    /// Path of the token refresh endpoint
    pub token_refresh_path: String,
    /// Where the session is persisted between runs
    pub session_file: PathBuf,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Maximum number of public feedback entries shown
    pub feedback_limit: usize,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            hindi_base_url: None,
            token_refresh_path: DEFAULT_TOKEN_REFRESH_PATH.to_string(),
            session_file: env::temp_dir().join("ngo-console-test-session.json"),
            request_timeout: Duration::from_secs(5),
            feedback_limit: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = env::var("NGO_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let hindi_base_url = env::var("NGO_API_BASE_URL_HI")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let session_file = match env::var("NGO_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file()?,
        };

        let request_timeout = parse_var("NGO_REQUEST_TIMEOUT_SECS", 30u64)?;
        let feedback_limit = parse_var("NGO_FEEDBACK_LIMIT", 10usize)?;

        Ok(Self {
            api_base_url: normalize_base("NGO_API_BASE_URL", &api_base_url)?,
            hindi_base_url: hindi_base_url.map(|u| normalize_base("NGO_API_BASE_URL_HI", &u)).transpose()?,
            token_refresh_path: env::var("NGO_TOKEN_REFRESH_PATH")
                .unwrap_or_else(|_| DEFAULT_TOKEN_REFRESH_PATH.to_string()),
            session_file,
            request_timeout: Duration::from_secs(request_timeout),
            feedback_limit,
        })
    }

    /// Test config pointing at a mock backend.
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

fn normalize_base(name: &'static str, url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid(name, url.to_string()));
    }
    Ok(trimmed.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

fn default_session_file() -> Result<PathBuf, ConfigError> {
    let home = env::var("HOME").map_err(|_| ConfigError::Missing("HOME"))?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("ngo-console")
        .join("session.json"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
