//! Story model returned by the story API.

use serde::{Deserialize, Serialize};

/// Story details. Only the fields this service reads are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub owner_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
