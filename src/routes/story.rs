// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social preview metadata for the site and for individual stories.
//!
//! Rendering the image itself is left to the page; these endpoints decide
//! what the card says. Lookup failures never surface as errors: a crawler
//! always gets a card.

use crate::error::AppError;
use crate::models::Story;
use crate::services::QueryKey;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/preview", get(site_preview))
        .route("/story/{story_id}/preview", get(story_preview))
}

pub const PREVIEW_WIDTH: u32 = 1200;
pub const PREVIEW_HEIGHT: u32 = 630;
pub const PREVIEW_CONTENT_TYPE: &str = "image/png";

const SITE_ALT: &str = "StorySync - Create, Share, Inspire";
const SITE_TAGLINE: &str = "Create, Share, and Inspire Stories";
const STORY_ALT: &str = "StorySync Story";
const STORY_NOT_FOUND: &str = "Story Not Found";
const PREVIEW_ERROR: &str = "Error Generating Image";
const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PreviewMetadata {
    pub alt: String,
    pub title: String,
    /// Tagline or byline under the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub width: u32,
    pub height: u32,
    pub content_type: String,
}

impl PreviewMetadata {
    fn new(alt: &str, title: impl Into<String>, subtitle: Option<String>) -> Self {
        Self {
            alt: alt.to_string(),
            title: title.into(),
            subtitle,
            width: PREVIEW_WIDTH,
            height: PREVIEW_HEIGHT,
            content_type: PREVIEW_CONTENT_TYPE.to_string(),
        }
    }

    pub fn site() -> Self {
        Self::new(SITE_ALT, "StorySync", Some(SITE_TAGLINE.to_string()))
    }

    /// Card for a story with a resolved owner name (blank means anonymous).
    pub fn story(title: &str, owner_name: &str) -> Self {
        let owner = owner_name.trim();
        let owner = if owner.is_empty() { ANONYMOUS } else { owner };
        Self::new(STORY_ALT, title, Some(format!("By {}", owner)))
    }

    /// Card used when the story could not be loaded.
    pub fn fallback(error: &AppError) -> Self {
        let title = match error {
            AppError::NotFound(_) => STORY_NOT_FOUND,
            _ => PREVIEW_ERROR,
        };
        Self::new(STORY_ALT, title, None)
    }
}

async fn site_preview() -> Json<PreviewMetadata> {
    Json(PreviewMetadata::site())
}

async fn story_preview(
    State(state): State<Arc<AppState>>,
    Path(story_id): Path<String>,
) -> Json<PreviewMetadata> {
    let story = match load_story(&state, &story_id).await {
        Ok(story) => story,
        Err(e) => {
            tracing::warn!(story_id = %story_id, error = %e, "Story preview lookup failed");
            return Json(PreviewMetadata::fallback(&e));
        }
    };

    // A missing owner only costs the byline
    let owner_name = match state.auth_api.get_user_name(&story.owner_id).await {
        Ok(owner) => owner.display_name(),
        Err(e) => {
            tracing::warn!(
                story_id = %story_id,
                owner_id = %story.owner_id,
                error = %e,
                "Owner lookup failed"
            );
            String::new()
        }
    };

    Json(PreviewMetadata::story(&story.title, &owner_name))
}

/// Story details, served from the query cache when present.
async fn load_story(state: &AppState, story_id: &str) -> Result<Story, AppError> {
    let key = QueryKey::Story(story_id.to_string());
    if let Some(story) = state.cache.get::<Story>(&key) {
        return Ok(story);
    }

    let story = state.story_api.get_details(story_id).await?;
    state.cache.set(key, &story);
    Ok(story)
}
