// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - external API clients and shared caches.

pub mod auth_api;
pub mod query_cache;
pub mod story_api;
pub mod upstream;

pub use auth_api::AuthApi;
pub use query_cache::{QueryCache, QueryKey};
pub use story_api::StoryApi;
