// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the external StorySync story API.

use axum::http::HeaderMap;

use super::upstream::{check_response, check_response_json, endpoint, ensure_authorized, Upstream};
use crate::error::AppError;
use crate::models::Story;

/// Story API client.
#[derive(Clone)]
pub struct StoryApi {
    http: reqwest::Client,
    base_url: String,
}

impl StoryApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Delete every story owned by the authenticated user.
    pub async fn delete_all_stories(&self, auth_headers: HeaderMap) -> Result<(), AppError> {
        ensure_authorized(&auth_headers)?;
        let url = endpoint(&self.base_url, &["all"])?;
        let response = self
            .http
            .delete(url)
            .headers(auth_headers)
            .send()
            .await
            .map_err(|e| Upstream::Story.error(format!("Story deletion request failed: {}", e)))?;

        check_response(Upstream::Story, response).await?;
        Ok(())
    }

    /// Public details of a story.
    pub async fn get_details(&self, story_id: &str) -> Result<Story, AppError> {
        let url = endpoint(&self.base_url, &[story_id])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Upstream::Story.error(format!("Story lookup failed: {}", e)))?;

        check_response_json(Upstream::Story, response).await
    }
}
