// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the external StorySync auth API.
//!
//! Handles:
//! - Login and registration
//! - Access token refresh
//! - Profile updates and account deletion
//! - Confirmation email resends and public owner names

use axum::http::HeaderMap;

use super::upstream::{check_response, check_response_json, endpoint, ensure_authorized, Upstream};
use crate::error::AppError;
use crate::models::{
    AccessToken, AuthResponse, LoginRequest, OwnerName, RegisterRequest, UpdateRequest,
    UserProfile,
};

/// Auth API client.
#[derive(Clone)]
pub struct AuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl AuthApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Exchange credentials for a user profile and token pair.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        let url = endpoint(&self.base_url, &["login"])?;
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| Upstream::Auth.error(format!("Login request failed: {}", e)))?;

        // A 401 here means bad credentials, not a stale session
        check_response_json(Upstream::Auth, response)
            .await
            .map_err(|e| match e {
                AppError::TokenRejected => AppError::InvalidCredentials,
                other => other,
            })
    }

    /// Create an account; responds like [`AuthApi::login`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        let url = endpoint(&self.base_url, &["register"])?;
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| Upstream::Auth.error(format!("Registration request failed: {}", e)))?;

        check_response_json(Upstream::Auth, response).await
    }

    /// Mint a new access token. `refresh_headers` carries the refresh bearer.
    pub async fn refresh(&self, refresh_headers: HeaderMap) -> Result<AccessToken, AppError> {
        ensure_authorized(&refresh_headers)?;
        let url = endpoint(&self.base_url, &["refresh"])?;
        let response = self
            .http
            .post(url)
            .headers(refresh_headers)
            .send()
            .await
            .map_err(|e| Upstream::Auth.error(format!("Token refresh request failed: {}", e)))?;

        check_response_json(Upstream::Auth, response).await
    }

    /// Apply a sparse profile patch; returns the authoritative profile.
    pub async fn update_profile(
        &self,
        auth_headers: HeaderMap,
        patch: &UpdateRequest,
    ) -> Result<UserProfile, AppError> {
        ensure_authorized(&auth_headers)?;
        let url = endpoint(&self.base_url, &["update"])?;
        let response = self
            .http
            .patch(url)
            .headers(auth_headers)
            .json(patch)
            .send()
            .await
            .map_err(|e| Upstream::Auth.error(format!("Profile update request failed: {}", e)))?;

        check_response_json(Upstream::Auth, response).await
    }

    /// Delete the authenticated user's account.
    pub async fn delete_account(&self, auth_headers: HeaderMap) -> Result<(), AppError> {
        ensure_authorized(&auth_headers)?;
        let url = endpoint(&self.base_url, &["delete"])?;
        let response = self
            .http
            .delete(url)
            .headers(auth_headers)
            .send()
            .await
            .map_err(|e| Upstream::Auth.error(format!("Account deletion request failed: {}", e)))?;

        check_response(Upstream::Auth, response).await?;
        Ok(())
    }

    /// Ask the auth API to send another confirmation email.
    pub async fn resend_confirmation_email(&self, auth_headers: HeaderMap) -> Result<(), AppError> {
        ensure_authorized(&auth_headers)?;
        let url = endpoint(&self.base_url, &["resend-confirmation"])?;
        let response = self
            .http
            .post(url)
            .headers(auth_headers)
            .send()
            .await
            .map_err(|e| Upstream::Auth.error(format!("Resend confirmation failed: {}", e)))?;

        check_response(Upstream::Auth, response).await?;
        Ok(())
    }

    /// Public first/last name of a story owner.
    pub async fn get_user_name(&self, owner_id: &str) -> Result<OwnerName, AppError> {
        let url = endpoint(&self.base_url, &["users", owner_id, "name"])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Upstream::Auth.error(format!("Owner lookup failed: {}", e)))?;

        check_response_json(Upstream::Auth, response).await
    }
}
