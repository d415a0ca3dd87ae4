// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile mutations against the external APIs.
//!
//! Each operation runs `Idle -> Pending -> {Success, Failed}`. Local state
//! (session cookies and the query cache) is only touched after the backend
//! confirms success, so a failed or abandoned request leaves it as it was.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use super::diff::diff;
use super::form::ProfileForm;
use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::services::{AuthApi, QueryCache, QueryKey, StoryApi};
use crate::session::{CookieStore, Session};

/// Kinds of mutation tracked by the in-flight registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Update,
    Delete,
    ResendConfirmation,
    Refresh,
}

impl MutationKind {
    pub fn label(self) -> &'static str {
        match self {
            MutationKind::Update => "Profile update",
            MutationKind::Delete => "Account deletion",
            MutationKind::ResendConfirmation => "Confirmation email request",
            MutationKind::Refresh => "Token refresh",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type InFlightKey = (String, MutationKind);

/// At most one mutation of each kind per user.
#[derive(Clone, Default)]
pub struct InFlightRegistry {
    pending: Arc<DashMap<InFlightKey, ()>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `kind` pending for `user_id` until the returned guard drops.
    pub fn begin(&self, user_id: &str, kind: MutationKind) -> Result<InFlight> {
        let key = (user_id.to_string(), kind);
        match self.pending.entry(key.clone()) {
            Entry::Occupied(_) => {
                tracing::info!(user_id, %kind, "Rejecting concurrent mutation");
                Err(AppError::InFlight(kind.label()))
            }
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(InFlight {
                    pending: Arc::clone(&self.pending),
                    key,
                })
            }
        }
    }

    pub fn is_pending(&self, user_id: &str, kind: MutationKind) -> bool {
        self.pending.contains_key(&(user_id.to_string(), kind))
    }
}

/// Releases its registry slot on drop, including when the request future is
/// cancelled mid-flight.
pub struct InFlight {
    pending: Arc<DashMap<InFlightKey, ()>>,
    key: InFlightKey,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.pending.remove(&self.key);
    }
}

/// Result of a profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The form matched the stored profile; the backend was not contacted.
    NoChanges,
    /// The backend accepted the patch and returned this profile.
    Updated(UserProfile),
}

/// Orchestrates profile mutations and reconciles local state.
#[derive(Clone)]
pub struct ProfileController {
    auth_api: AuthApi,
    story_api: StoryApi,
    cache: QueryCache,
    in_flight: InFlightRegistry,
}

impl ProfileController {
    pub fn new(auth_api: AuthApi, story_api: StoryApi, cache: QueryCache) -> Self {
        Self {
            auth_api,
            story_api,
            cache,
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// Last-known profile: the cached server copy if present, else the cookie.
    pub fn current_profile<S: CookieStore>(&self, session: &Session<S>) -> Result<UserProfile> {
        let user = session.require_user()?;
        let cached = session
            .user_id()
            .and_then(|id| self.cache.get::<UserProfile>(&QueryKey::UserProfile(id)));
        Ok(cached.unwrap_or(user))
    }

    /// Apply the changed fields of `form` to the profile.
    pub async fn update<S: CookieStore>(
        &self,
        session: &mut Session<S>,
        form: ProfileForm,
    ) -> Result<UpdateOutcome> {
        form.validate()?;

        let current = self.current_profile(session)?;
        let patch = diff(&form, &current);
        if patch.is_empty() {
            tracing::debug!(user_id = %current.id, "Profile form unchanged");
            return Ok(UpdateOutcome::NoChanges);
        }

        let (user_id, headers) = authenticated(session)?;
        let _guard = self.in_flight.begin(&user_id, MutationKind::Update)?;

        tracing::info!(
            user_id = %user_id,
            fields = ?patch.changed_fields(),
            "Updating profile"
        );
        let updated = self.auth_api.update_profile(headers, &patch).await?;

        // Cache under the returned id, and only when it is the session's own
        if updated.id.trim() == user_id {
            self.cache.set(QueryKey::UserProfile(user_id.clone()), &updated);
        } else {
            tracing::warn!(
                user_id = %user_id,
                returned_id = %updated.id,
                "Updated profile belongs to another user, not caching"
            );
        }
        session.replace_user(&updated)?;

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Delete every story, then the account. The two calls are not atomic: if
    /// the second fails the stories are already gone and the session stays.
    pub async fn delete_account<S: CookieStore>(&self, session: &mut Session<S>) -> Result<()> {
        let (user_id, headers) = authenticated(session)?;
        let _guard = self.in_flight.begin(&user_id, MutationKind::Delete)?;

        tracing::info!(user_id = %user_id, "User-initiated account deletion");

        self.story_api
            .delete_all_stories(headers.clone())
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %user_id, error = %e, "Story deletion failed");
            })?;

        self.auth_api.delete_account(headers).await.inspect_err(|e| {
            tracing::error!(
                user_id = %user_id,
                error = %e,
                "Stories deleted but account deletion failed"
            );
        })?;

        session.clear();
        self.cache.remove(&QueryKey::UserProfile(user_id.clone()));

        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }

    pub async fn resend_confirmation<S: CookieStore>(&self, session: &Session<S>) -> Result<()> {
        let (user_id, headers) = authenticated(session)?;
        let _guard = self
            .in_flight
            .begin(&user_id, MutationKind::ResendConfirmation)?;

        self.auth_api.resend_confirmation_email(headers).await?;
        tracing::info!(user_id = %user_id, "Confirmation email requested");
        Ok(())
    }

    /// Mint a new access token from the refresh cookie and store it.
    pub async fn refresh<S: CookieStore>(&self, session: &mut Session<S>) -> Result<()> {
        let headers = session.refresh_headers();
        if headers.is_empty() {
            return Err(AppError::Unauthorized);
        }
        // Without a user cookie there is nothing to key the guard on
        let user_id = session.user_id();
        let _guard = user_id
            .as_deref()
            .map(|id| self.in_flight.begin(id, MutationKind::Refresh))
            .transpose()?;

        let token = self.auth_api.refresh(headers).await?;
        session.store_access_token(&token)?;

        tracing::debug!(user_id = ?user_id, "Access token refreshed");
        Ok(())
    }

    /// Forget the session locally.
    pub fn logout<S: CookieStore>(&self, session: &mut Session<S>) {
        if let Some(user_id) = session.user_id() {
            self.cache.remove(&QueryKey::UserProfile(user_id.clone()));
            tracing::info!(user_id = %user_id, "User logged out");
        }
        session.clear();
    }
}

/// User id and bearer headers, or `Unauthorized` before any network call.
fn authenticated<S: CookieStore>(
    session: &Session<S>,
) -> Result<(String, axum::http::HeaderMap)> {
    let headers = session.auth_headers();
    if headers.is_empty() {
        return Err(AppError::Unauthorized);
    }
    let user_id = session.user_id().ok_or(AppError::Unauthorized)?;
    Ok((user_id, headers))
}
