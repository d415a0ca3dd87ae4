// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared request/response plumbing for the external StorySync APIs.

use axum::http::{header, HeaderMap};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Which external API a call went to; decides the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Auth,
    Story,
}

impl Upstream {
    /// Wrap a message in this API's error variant.
    pub fn error(self, message: impl Into<String>) -> AppError {
        match self {
            Upstream::Auth => AppError::AuthApi(message.into()),
            Upstream::Story => AppError::StoryApi(message.into()),
        }
    }
}

/// Join path segments onto a base URL, percent-encoding each segment.
pub fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid API base URL {}: {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("API base URL cannot be a base: {}", base_url)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Refuse to call an authenticated endpoint without credentials.
pub fn ensure_authorized(headers: &HeaderMap) -> Result<(), AppError> {
    if headers.contains_key(header::AUTHORIZATION) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Pull a user-facing message out of an error body: the first string among
/// `message`, `detail`, `error`.
pub fn error_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .find_map(|field| json.get(*field)?.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Check response status and return error if not successful.
pub async fn check_response(
    upstream: Upstream,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));

    match status.as_u16() {
        401 => {
            tracing::info!(?upstream, "Upstream rejected session token (401)");
            Err(AppError::TokenRejected)
        }
        404 => Err(AppError::NotFound(message)),
        _ => Err(upstream.error(message)),
    }
}

/// Check response and parse JSON body.
pub async fn check_response_json<T: DeserializeOwned>(
    upstream: Upstream,
    response: reqwest::Response,
) -> Result<T, AppError> {
    check_response(upstream, response)
        .await?
        .json()
        .await
        .map_err(|e| upstream.error(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let url = endpoint("http://api.test/auth", &["users", "a b/c", "name"]).unwrap();
        assert_eq!(url.as_str(), "http://api.test/auth/users/a%20b%2Fc/name");

        let url = endpoint("http://api.test/stories/", &["all"]).unwrap();
        assert_eq!(url.as_str(), "http://api.test/stories/all");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        assert!(endpoint("not a url", &["x"]).is_err());
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        assert_eq!(
            error_message(r#"{"message": "Email already taken", "detail": "x"}"#).as_deref(),
            Some("Email already taken")
        );
        assert_eq!(
            error_message(r#"{"detail": "Not allowed"}"#).as_deref(),
            Some("Not allowed")
        );
        assert_eq!(error_message(r#"{"error": ""}"#), None);
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn test_ensure_authorized() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            ensure_authorized(&headers),
            Err(AppError::Unauthorized)
        ));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        assert!(ensure_authorized(&headers).is_ok());
    }
}
