// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page endpoints.

use super::Notice;
use crate::error::Result;
use crate::models::UserProfile;
use crate::profile::{ProfileForm, UpdateOutcome};
use crate::session::Session;
use crate::time_utils::format_display_date;
use crate::AppState;
use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/profile",
            get(get_profile).patch(update_profile).delete(delete_account),
        )
        .route(
            "/api/profile/resend-confirmation",
            post(resend_confirmation),
        )
}

/// Warning shown while the email address is unconfirmed.
pub const UNCONFIRMED_EMAIL_WARNING: &str =
    "Your account will be deleted in 3 days if you do not confirm your email.";

/// Profile as the page renders it.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored birthdate, empty when never set
    pub birthdate: String,
    /// `DD/MM/YYYY` or `N/A`
    pub joined: String,
    pub email_confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_warning: Option<String>,
}

impl From<UserProfile> for ProfileView {
    fn from(user: UserProfile) -> Self {
        let joined = format_display_date(Some(&user.date_joined));
        let email_warning =
            (!user.email_confirmed).then(|| UNCONFIRMED_EMAIL_WARNING.to_string());

        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            birthdate: user.birthdate,
            joined,
            email_confirmed: user.email_confirmed,
            email_warning,
        }
    }
}

/// Response to a profile update.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpdateResponse {
    pub notice: Notice,
    pub user: ProfileView,
}

/// Current profile, or 401 asking the user to log in again.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ProfileView>> {
    let session = state.session(&headers);
    let user = state.profile.current_profile(&session)?;
    Ok(Json(user.into()))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<ProfileForm>,
) -> Result<(SignedCookieJar, Json<UpdateResponse>)> {
    let mut session = state.session(&headers);

    let response = match state.profile.update(&mut session, form).await? {
        UpdateOutcome::NoChanges => UpdateResponse {
            notice: Notice::info("No changes to update"),
            user: state.profile.current_profile(&session)?.into(),
        },
        UpdateOutcome::Updated(user) => UpdateResponse {
            notice: Notice::success("Profile updated successfully"),
            user: user.into(),
        },
    };

    Ok((session.into_jar(), Json(response)))
}

/// Delete all stories, then the account, then the session.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(SignedCookieJar, Json<Notice>)> {
    let mut session = state.session(&headers);
    state.profile.delete_account(&mut session).await?;

    Ok((
        session.into_jar(),
        Json(Notice::success("Account deleted successfully").redirect_to("/login")),
    ))
}

async fn resend_confirmation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Notice>> {
    let session = state.session(&headers);
    state.profile.resend_confirmation(&session).await?;

    Ok(Json(Notice::success(
        "Confirmation email sent. Please check your inbox.",
    )))
}
