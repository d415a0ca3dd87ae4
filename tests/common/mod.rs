// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};
use serde_json::{json, Value};
use std::sync::Arc;
use storysync_web::config::Config;
use storysync_web::routes::create_router;
use storysync_web::AppState;

/// Create a test app whose external APIs live at `api_url`
/// (`{api_url}/auth` and `{api_url}/stories`).
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(api_url: &str) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::with_api_url(api_url))
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, reqwest::Client::new()).unwrap());
    (create_router(state.clone()), state)
}

/// Stored user profile as the auth API returns it.
#[allow(dead_code)]
pub fn user_json() -> Value {
    json!({
        "id": "u-1",
        "username": "ada",
        "email": "a@x.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "birthdate": "1990-05-01T00:00:00.000Z",
        "email_confirmed": true,
        "date_joined": "2024-02-03T10:00:00Z"
    })
}

/// Login/registration response body.
#[allow(dead_code)]
pub fn auth_response_json() -> Value {
    json!({
        "message": "Login successful",
        "user": user_json(),
        "tokens": {
            "access_token": "acc-123",
            "access_created_at": "2026-01-01T00:00:00Z",
            "access_expires_at": "2026-01-01T00:15:00Z",
            "refresh_token": "ref-456",
            "refresh_created_at": "2026-01-01T00:00:00Z",
            "refresh_expires_at": "2026-01-08T00:00:00Z"
        }
    })
}

/// Key the test apps sign their cookies with.
#[allow(dead_code)]
pub fn cookie_key() -> Key {
    Config::test_default().cookie_key().unwrap()
}

/// `name=value` pair signed with `key`, as a browser sends it back.
#[allow(dead_code)]
pub fn signed_cookie_with(key: Key, name: &str, value: &Value) -> String {
    let response = SignedCookieJar::<Key>::new(key)
        .add(Cookie::new(name.to_string(), value.to_string()))
        .into_response();
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[allow(dead_code)]
pub fn signed_cookie(name: &str, value: &Value) -> String {
    signed_cookie_with(cookie_key(), name, value)
}

/// `Cookie` request header for a logged-in browser.
#[allow(dead_code)]
pub fn session_cookie_header() -> String {
    session_cookie_header_for(&user_json(), Some("acc-123"))
}

/// `Cookie` header with the given user and (optional) access token.
#[allow(dead_code)]
pub fn session_cookie_header_for(user: &Value, access_token: Option<&str>) -> String {
    let mut cookies = vec![
        signed_cookie("user", user),
        signed_cookie("refresh", &json!({ "refresh_token": "ref-456" })),
    ];
    if let Some(token) = access_token {
        cookies.push(signed_cookie("access", &json!({ "access_token": token })));
    }
    cookies.join("; ")
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
}

/// Verify and decode the JSON value of a `Set-Cookie` header.
#[allow(dead_code)]
pub fn cookie_json(set_cookie: &str) -> Value {
    let pair = set_cookie.split(';').next().unwrap();
    let name = pair.split_once('=').map(|(name, _)| name).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
    let jar = SignedCookieJar::<Key>::from_headers(&headers, cookie_key());
    let cookie = jar
        .get(name)
        .unwrap_or_else(|| panic!("{name} cookie is not signed with the app key"));
    serde_json::from_str(cookie.value()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
