// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile forms, change detection and the mutation controller.

pub mod controller;
pub mod diff;
pub mod form;

pub use controller::{InFlightRegistry, MutationKind, ProfileController, UpdateOutcome};
pub use diff::diff;
pub use form::{LoginForm, ProfileForm, RegisterForm};
