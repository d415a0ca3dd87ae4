// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration, token refresh and logout.

use crate::error::Result;
use crate::models::{AuthResponse, UserProfile};
use crate::profile::{LoginForm, RegisterForm};
use crate::services::QueryKey;
use crate::session::Session;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

/// Response to a successful login or registration. Tokens travel only in
/// cookies.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Store the session cookies and prime the profile cache.
fn start_session(
    state: &AppState,
    headers: &HeaderMap,
    response: AuthResponse,
) -> Result<(SignedCookieJar, Json<SessionResponse>)> {
    let mut session = state.session(headers);
    session.store_login(&response)?;
    state.cache.set(
        QueryKey::UserProfile(response.user.id.clone()),
        &response.user,
    );

    Ok((
        session.into_jar(),
        Json(SessionResponse {
            message: response.message,
            user: response.user,
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<LoginForm>,
) -> Result<(SignedCookieJar, Json<SessionResponse>)> {
    form.validate()?;

    let response = state.auth_api.login(&form.into_request()).await?;
    tracing::info!(user_id = %response.user.id, "User logged in");

    start_session(&state, &headers, response)
}

async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<RegisterForm>,
) -> Result<(SignedCookieJar, Json<SessionResponse>)> {
    form.validate()?;

    let response = state.auth_api.register(&form.into_request()).await?;
    tracing::info!(user_id = %response.user.id, "User registered");

    start_session(&state, &headers, response)
}

/// Exchange the refresh cookie for a new access cookie.
async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(SignedCookieJar, StatusCode)> {
    let mut session = state.session(&headers);
    state.profile.refresh(&mut session).await?;
    Ok((session.into_jar(), StatusCode::NO_CONTENT))
}

/// Clear the session cookies and send the browser home.
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (SignedCookieJar, Redirect) {
    let mut session = state.session(&headers);
    state.profile.logout(&mut session);
    (session.into_jar(), Redirect::to("/"))
}
