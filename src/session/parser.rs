// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed decoding of JSON cookie payloads.

use serde::de::DeserializeOwned;

use super::store::CookieStore;

/// Why a cookie could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieParseError {
    #[error("Cookie {cookie} not found")]
    NotFound { cookie: String },

    #[error("Failed to parse {cookie} cookie: {message}")]
    Malformed { cookie: String, message: String },
}

impl CookieParseError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CookieParseError::NotFound { .. })
    }
}

/// Outcome of decoding a cookie: typed data or a diagnostic.
pub type ParseResult<T> = Result<T, CookieParseError>;

/// Decode the named cookie as JSON into `T`.
///
/// An absent or empty cookie is `NotFound`; anything that does not decode
/// into the full shape of `T` is `Malformed`. Never panics.
pub fn parse_cookie<T, S>(store: &S, cookie: &str) -> ParseResult<T>
where
    T: DeserializeOwned,
    S: CookieStore + ?Sized,
{
    let raw = store.read(cookie).unwrap_or_default();
    if raw.is_empty() {
        return Err(CookieParseError::NotFound {
            cookie: cookie.to_string(),
        });
    }

    serde_json::from_str(&raw).map_err(|e| CookieParseError::Malformed {
        cookie: cookie.to_string(),
        message: e.to_string(),
    })
}
