// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! StorySync web: backend-for-frontend for the StorySync story platform
//!
//! This crate keeps the browser session (user profile plus access/refresh
//! tokens in cookies), drives profile mutations against the external auth and
//! story APIs, and serves social-preview metadata for stories.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod profile;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::Key;
use config::{Config, ConfigError};
use profile::ProfileController;
use services::{AuthApi, QueryCache, StoryApi};
use session::{JarCookieStore, Session};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth_api: AuthApi,
    pub story_api: StoryApi,
    pub cache: QueryCache,
    pub profile: ProfileController,
    cookie_key: Key,
}

impl AppState {
    /// Wire up the API clients, cache and controller from configuration.
    pub fn new(config: Config, http: reqwest::Client) -> Result<Self, ConfigError> {
        let cookie_key = config.cookie_key()?;
        let auth_api = AuthApi::new(http.clone(), config.auth_api_url.clone());
        let story_api = StoryApi::new(http, config.story_api_url.clone());
        let cache = QueryCache::with_ttl(config.cache_ttl());
        let profile = ProfileController::new(auth_api.clone(), story_api.clone(), cache.clone());

        Ok(Self {
            config,
            auth_api,
            story_api,
            cache,
            profile,
            cookie_key,
        })
    }

    /// Session over the request's signed cookies.
    pub fn session(&self, headers: &HeaderMap) -> Session<JarCookieStore> {
        Session::from_headers(headers, &self.cookie_key, &self.config)
    }
}
