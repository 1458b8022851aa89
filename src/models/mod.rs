// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod recipe;
pub mod user;

pub use recipe::{Recipe, RecipeInput, RecipeStats, RecipeUpdateInput};
pub use user::{GithubProfile, User};
