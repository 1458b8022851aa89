// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// User profile stored in the `users` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Internal id (also referenced by `recipes.user_id`)
    pub id: String,
    /// GitHub user id, string-encoded
    pub github_id: String,
    /// GitHub login
    pub username: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Avatar URL
    pub avatar_url: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// When the user first signed in
    pub created_at: String,
    /// Most recent sign-in
    pub last_login: String,
}

/// Profile as reported by the identity provider, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubProfile {
    pub github_id: String,
    pub username: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub name: Option<String>,
}
