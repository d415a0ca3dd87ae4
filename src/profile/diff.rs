// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minimal patch between a submitted profile form and the stored profile.

use super::form::ProfileForm;
use crate::models::{UpdateRequest, UserProfile};
use crate::time_utils::normalize_iso;

/// Fields that differ from `current`. Blank input already reads as `None` in
/// [`ProfileForm`], so absent fields never appear. The password appears
/// whenever it was filled in and the confirmation never does.
pub fn diff(form: &ProfileForm, current: &UserProfile) -> UpdateRequest {
    UpdateRequest {
        username: changed(form.username.as_deref(), &current.username),
        email: changed(form.email.as_deref(), &current.email),
        first_name: changed(form.first_name.as_deref(), &current.first_name),
        last_name: changed(form.last_name.as_deref(), &current.last_name),
        birthdate: changed_date(form.birthdate.as_deref(), &current.birthdate),
        password: form.password.clone(),
    }
}

fn changed(submitted: Option<&str>, current: &str) -> Option<String> {
    submitted.filter(|value| *value != current).map(str::to_string)
}

/// Dates are compared in normalized ISO form. A stored date that is missing or
/// does not parse always counts as changed.
fn changed_date(submitted: Option<&str>, current: &str) -> Option<String> {
    let submitted = normalize_iso(submitted?)?;
    match normalize_iso(current) {
        Some(stored) if stored == submitted => None,
        _ => Some(submitted),
    }
}
