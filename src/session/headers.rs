// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `Authorization` header construction from stored tokens.

use axum::http::{header, HeaderMap, HeaderValue};

use super::parser::parse_cookie;
use super::store::CookieStore;
use super::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::models::{AccessToken, RefreshToken};

/// Which stored token authorizes the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Cookie holding this token.
    pub fn cookie_name(self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_COOKIE,
            TokenKind::Refresh => REFRESH_COOKIE,
        }
    }
}

/// Read the bearer string for `kind`, trimmed. `None` if the cookie is
/// absent, malformed, or blank.
pub fn stored_token<S: CookieStore + ?Sized>(store: &S, kind: TokenKind) -> Option<String> {
    let parsed = match kind {
        TokenKind::Access => {
            parse_cookie::<AccessToken, _>(store, kind.cookie_name()).map(|t| t.access_token)
        }
        TokenKind::Refresh => {
            parse_cookie::<RefreshToken, _>(store, kind.cookie_name()).map(|t| t.refresh_token)
        }
    };

    let token = match parsed {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(cookie = kind.cookie_name(), error = %e, "Stored token unavailable");
            return None;
        }
    };

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Build the `Authorization` header for `kind`.
///
/// Returns an empty map when no usable token is stored; callers treat that
/// as "unauthenticated" instead of sending a malformed request.
pub fn build_auth_header<S: CookieStore + ?Sized>(store: &S, kind: TokenKind) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let Some(token) = stored_token(store, kind) else {
        return headers;
    };

    match HeaderValue::from_str(&format!("Bearer {}", token)) {
        Ok(value) => {
            headers.insert(header::AUTHORIZATION, value);
        }
        Err(_) => {
            tracing::warn!(
                cookie = kind.cookie_name(),
                "Stored token contains characters not allowed in a header"
            );
        }
    }

    headers
}
