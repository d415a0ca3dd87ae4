//! User and token models exchanged with the auth API and stored in cookies.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile as returned by the auth API (stored in the `user` cookie).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO 8601 date or timestamp; empty when never set
    #[serde(default, deserialize_with = "null_as_empty")]
    pub birthdate: String,
    pub email_confirmed: bool,
    pub date_joined: String,
}

/// The auth API sends `null` for a birthdate that was never set.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Access/refresh token pair issued at login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    pub access_created_at: String,
    pub access_expires_at: String,
    pub refresh_token: String,
    pub refresh_created_at: String,
    pub refresh_expires_at: String,
}

impl Tokens {
    /// Split into the halves stored in the `access` and `refresh` cookies.
    pub fn split(self) -> (AccessToken, RefreshToken) {
        (
            AccessToken {
                access_token: self.access_token,
                access_created_at: self.access_created_at,
                access_expires_at: self.access_expires_at,
            },
            RefreshToken {
                refresh_token: self.refresh_token,
                refresh_created_at: self.refresh_created_at,
                refresh_expires_at: self.refresh_expires_at,
            },
        )
    }
}

/// Short-lived bearer credential (stored in the `access` cookie).
///
/// Only the bearer string is required; timestamps are informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub access_created_at: String,
    #[serde(default)]
    pub access_expires_at: String,
}

/// Long-lived credential used to mint access tokens (stored in the `refresh` cookie).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_created_at: String,
    #[serde(default)]
    pub refresh_expires_at: String,
}

/// Response to both login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
    pub tokens: Tokens,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Email address or username
    pub identifier: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: String,
}

/// Sparse profile patch. Only populated fields go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateRequest {
    /// True when no field is populated; such a request must never be sent.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.birthdate.is_none()
            && self.password.is_none()
    }

    /// Names of the populated fields, for logging.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("username", self.username.is_some()),
            ("email", self.email.is_some()),
            ("first_name", self.first_name.is_some()),
            ("last_name", self.last_name.is_some()),
            ("birthdate", self.birthdate.is_some()),
            ("password", self.password.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// Public display name of a story owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerName {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl OwnerName {
    /// `"<first> <last>"` with surrounding whitespace removed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
