// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration and profile forms.
//!
//! Every form is validated before anything goes over the network.

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{LoginRequest, RegisterRequest};
use crate::time_utils::{eighteen_years_ago, min_birthdate, normalize_iso, parse_timestamp};

/// Deserialize a string field, reading blank input as absent.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Birthdate must parse and fall between 1900-01-01 and 18 years ago.
fn validate_birthdate(raw: &str) -> Result<(), ValidationError> {
    let Some(date) = parse_timestamp(raw).map(|dt| dt.date_naive()) else {
        return Err(ValidationError::new("birthdate_format").with_message("Invalid date".into()));
    };

    if date < min_birthdate() {
        return Err(ValidationError::new("birthdate_range")
            .with_message("Birthdate cannot be before 1900-01-01".into()));
    }
    if date > eighteen_years_ago(Utc::now().date_naive()) {
        return Err(ValidationError::new("birthdate_range")
            .with_message("You must be at least 18 years old".into()));
    }

    Ok(())
}

fn validate_not_blank(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("This field is required".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    /// Email address or username
    #[validate(custom(function = "validate_not_blank"))]
    pub identifier: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> LoginRequest {
        LoginRequest {
            identifier: self.identifier.trim().to_string(),
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, message = "Username must be at least 2 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub last_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_birthdate"))]
    pub birthdate: Option<String>,
}

impl RegisterForm {
    /// Wire request. The confirmation field stays behind.
    pub fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            birthdate: self
                .birthdate
                .as_deref()
                .and_then(normalize_iso)
                .unwrap_or_default(),
        }
    }
}

/// Profile edit form. Every field is optional and blank means "leave as is".
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 2, message = "Username must be at least 2 characters"))]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_birthdate"))]
    pub birthdate: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub confirm_password: Option<String>,
}

impl ProfileForm {
    /// Field rules plus the password confirmation, reported on
    /// `confirm_password`.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Validate::validate(self)
            .err()
            .unwrap_or_else(ValidationErrors::new);

        if self.password != self.confirm_password {
            errors.add(
                "confirm_password",
                ValidationError::new("must_match").with_message("Passwords don't match".into()),
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
