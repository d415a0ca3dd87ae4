// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookie-backed user session.
//!
//! Three cookies make up a session:
//! - `user`: JSON [`UserProfile`]
//! - `access`: JSON [`AccessToken`]
//! - `refresh`: JSON [`RefreshToken`]
//!
//! [`Session`] is the explicit context handed to the profile controller and
//! route handlers; nothing reads cookies behind its back.

pub mod headers;
pub mod parser;
pub mod store;

pub use headers::{build_auth_header, TokenKind};
pub use parser::{parse_cookie, CookieParseError, ParseResult};
pub use store::{CookiePolicy, CookieStore, JarCookieStore, MemoryCookieStore};

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Key, SignedCookieJar};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{AccessToken, AuthResponse, RefreshToken, UserProfile};

pub const USER_COOKIE: &str = "user";
pub const ACCESS_COOKIE: &str = "access";
pub const REFRESH_COOKIE: &str = "refresh";

/// A user session over some cookie store.
#[derive(Debug, Clone)]
pub struct Session<S> {
    store: S,
}

impl Session<JarCookieStore> {
    /// Session over the request's cookies, verified with `key`.
    pub fn from_headers(headers: &HeaderMap, key: &Key, config: &Config) -> Self {
        let jar = SignedCookieJar::<Key>::from_headers(headers, key.clone());
        Self::new(JarCookieStore::new(
            jar,
            key.clone(),
            CookiePolicy::from_config(config),
        ))
    }

    /// Jar carrying every cookie change made through this session.
    pub fn into_jar(self) -> SignedCookieJar {
        self.store.into_jar()
    }
}

impl<S: CookieStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Stored user profile.
    pub fn user(&self) -> ParseResult<UserProfile> {
        parse_cookie(&self.store, USER_COOKIE)
    }

    /// Stored user profile, or `Unauthorized` so the page asks for a re-login.
    pub fn require_user(&self) -> Result<UserProfile, AppError> {
        self.user().map_err(|e| {
            tracing::debug!(error = %e, "No usable user cookie");
            AppError::Unauthorized
        })
    }

    /// Trimmed id of the stored user; `None` when missing or blank.
    pub fn user_id(&self) -> Option<String> {
        let user = self.user().ok()?;
        let id = user.id.trim();
        (!id.is_empty()).then(|| id.to_string())
    }

    /// Stored access token, trimmed.
    pub fn access_token(&self) -> Option<String> {
        headers::stored_token(&self.store, TokenKind::Access)
    }

    /// `Authorization` header from the access token; empty when absent.
    pub fn auth_headers(&self) -> HeaderMap {
        build_auth_header(&self.store, TokenKind::Access)
    }

    /// `Authorization` header from the refresh token; empty when absent.
    pub fn refresh_headers(&self) -> HeaderMap {
        build_auth_header(&self.store, TokenKind::Refresh)
    }

    /// Whether an access token is present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Persist the user and both tokens after login or registration.
    pub fn store_login(&mut self, response: &AuthResponse) -> Result<(), AppError> {
        let (access, refresh) = response.tokens.clone().split();
        self.write_json(USER_COOKIE, &response.user)?;
        self.write_json(ACCESS_COOKIE, &access)?;
        self.write_json(REFRESH_COOKIE, &refresh)?;
        Ok(())
    }

    /// Replace the stored profile wholesale. The old cookie is deleted before
    /// the new one is written so no merge can happen in the store.
    pub fn replace_user(&mut self, user: &UserProfile) -> Result<(), AppError> {
        self.store.remove(USER_COOKIE);
        self.write_json(USER_COOKIE, user)
    }

    /// Replace the stored access token (after a refresh).
    pub fn store_access_token(&mut self, token: &AccessToken) -> Result<(), AppError> {
        self.write_json(ACCESS_COOKIE, token)
    }

    /// Replace the stored refresh token.
    pub fn store_refresh_token(&mut self, token: &RefreshToken) -> Result<(), AppError> {
        self.write_json(REFRESH_COOKIE, token)
    }

    /// Drop every session cookie (logout, account deletion).
    pub fn clear(&mut self) {
        for name in [USER_COOKIE, ACCESS_COOKIE, REFRESH_COOKIE] {
            self.store.remove(name);
        }
    }

    fn write_json<T: serde::Serialize>(&mut self, name: &str, value: &T) -> Result<(), AppError> {
        let json = serde_json::to_string(value).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to serialize {} cookie: {}", name, e))
        })?;
        self.store.write(name, &json);
        Ok(())
    }
}
