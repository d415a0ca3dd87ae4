// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Named cookie storage.
//!
//! [`CookieStore`] is plain text key/value storage; it never inspects the
//! values it holds. [`JarCookieStore`] backs it with the request's signed
//! cookie jar so that every mutation turns into a `Set-Cookie` header on the
//! response. The jar percent-encodes values on the way out and decodes them on
//! the way in, so JSON payloads survive the trip unchanged.
//!
//! Each value is prefixed with an HMAC of the cookie. A cookie whose signature
//! does not verify reads as absent, so the `user` id can be trusted as a cache
//! and in-flight key even though page scripts can read it.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use std::collections::HashMap;

use crate::config::Config;

/// Text key/value storage for named cookies.
///
/// Mutations take effect immediately: a `read` after a `write` or `remove`
/// observes the new state.
pub trait CookieStore {
    /// Raw value of the named cookie, if present.
    fn read(&self, name: &str) -> Option<String>;

    /// Store `value` under `name`, replacing any previous value.
    fn write(&mut self, name: &str, value: &str);

    /// Delete the named cookie. Removing an absent cookie is a no-op.
    fn remove(&mut self, name: &str);
}

/// In-memory cookie store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieStore {
    cookies: HashMap<String, String>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cookies currently held.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieStore for MemoryCookieStore {
    fn read(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    fn write(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
    }
}

/// Attributes applied to every cookie written by [`JarCookieStore`].
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub domain: Option<String>,
    pub max_age_days: i64,
    /// Cookies hidden from page scripts
    pub http_only: &'static [&'static str],
}

impl CookiePolicy {
    /// Build the cookie policy from application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            secure: config.secure_cookies(),
            domain: config.cookie_domain.clone(),
            max_age_days: config.cookie_max_age_days,
            http_only: &[super::ACCESS_COOKIE, super::REFRESH_COOKIE],
        }
    }

    fn build(&self, name: &str, value: String) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_string(), value))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(self.http_only.contains(&name))
            .secure(self.secure)
            .max_age(time::Duration::days(self.max_age_days));

        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }

        builder.build()
    }

    fn removal(&self, name: &str) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_string(), String::new())).path("/");
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }
}

/// Cookie store backed by the request's [`SignedCookieJar`].
///
/// Return the jar from the handler with [`JarCookieStore::into_jar`] to emit
/// the accumulated `Set-Cookie` headers.
pub struct JarCookieStore {
    jar: SignedCookieJar,
    key: Key,
    policy: CookiePolicy,
}

impl JarCookieStore {
    pub fn new(jar: SignedCookieJar, key: Key, policy: CookiePolicy) -> Self {
        Self { jar, key, policy }
    }

    /// Consume the store, yielding the jar with all pending changes.
    pub fn into_jar(self) -> SignedCookieJar {
        self.jar
    }

    fn update(&mut self, f: impl FnOnce(SignedCookieJar) -> SignedCookieJar) {
        let placeholder = SignedCookieJar::<Key>::new(self.key.clone());
        let jar = std::mem::replace(&mut self.jar, placeholder);
        self.jar = f(jar);
    }
}

impl CookieStore for JarCookieStore {
    fn read(&self, name: &str) -> Option<String> {
        self.jar.get(name).map(|cookie| cookie.value().to_string())
    }

    fn write(&mut self, name: &str, value: &str) {
        let cookie = self.policy.build(name, value.to_string());
        self.update(|jar| jar.add(cookie));
    }

    fn remove(&mut self, name: &str) {
        let cookie = self.policy.removal(name);
        self.update(|jar| jar.remove(cookie));
    }
}
