// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use axum_extra::extract::cookie::Key;
use std::env;
use std::time::Duration;

/// Minimum length of `COOKIE_SECRET` in bytes.
pub const MIN_COOKIE_SECRET_LEN: usize = 64;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external auth API (e.g. `https://api.example.com/auth`)
    pub auth_api_url: String,
    /// Base URL of the external story API (e.g. `https://api.example.com/stories`)
    pub story_api_url: String,
    /// Public URL this site is served from; decides the `Secure` cookie flag
    pub site_url: String,
    /// Server port
    pub port: u16,
    /// Optional `Domain` attribute for session cookies
    pub cookie_domain: Option<String>,
    /// Lifetime of session cookies in days
    pub cookie_max_age_days: i64,
    /// Secret the session cookies are signed with (at least 64 bytes)
    pub cookie_secret: String,
    /// How long cached server data is served before it is refetched
    pub cache_ttl_secs: u64,
}

impl Config {
    /// Config for tests: both APIs point at `api_url`.
    pub fn test_default() -> Self {
        Self::with_api_url("http://localhost:8000")
    }

    /// Config for tests with every external API rooted at `api_url`.
    pub fn with_api_url(api_url: &str) -> Self {
        let api_url = api_url.trim_end_matches('/');
        Self {
            auth_api_url: format!("{}/auth", api_url),
            story_api_url: format!("{}/stories", api_url),
            site_url: "http://localhost:3000".to_string(),
            port: 3000,
            cookie_domain: None,
            cookie_max_age_days: 30,
            cookie_secret: "storysync-test-cookie-secret-".repeat(3),
            cache_ttl_secs: 300,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            auth_api_url: required_url("AUTH_API_URL")?,
            story_api_url: required_url("STORY_API_URL")?,
            site_url: env::var("SITE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            cookie_domain: env::var("COOKIE_DOMAIN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            cookie_max_age_days: env::var("COOKIE_MAX_AGE_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("COOKIE_MAX_AGE_DAYS"))?,
            cookie_secret: cookie_secret()?,
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("CACHE_TTL_SECS"))?,
        })
    }

    /// Whether cookies must carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.site_url.starts_with("https://")
    }

    /// Signing key for the session cookies.
    pub fn cookie_key(&self) -> Result<Key, ConfigError> {
        Key::try_from(self.cookie_secret.as_bytes())
            .map_err(|_| ConfigError::Invalid("COOKIE_SECRET"))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn cookie_secret() -> Result<String, ConfigError> {
    let secret = env::var("COOKIE_SECRET").map_err(|_| ConfigError::Missing("COOKIE_SECRET"))?;
    if secret.len() < MIN_COOKIE_SECRET_LEN {
        return Err(ConfigError::Invalid("COOKIE_SECRET"));
    }
    Ok(secret)
}

fn required_url(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    let value = value.trim().trim_end_matches('/');
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::Invalid(name));
    }
    Ok(value.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
