// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory.
//!
//! Users are only ever written by a successful GitHub sign-in; there is no
//! standalone create or delete.

use super::Database;
use crate::error::AppError;
use crate::models::{GithubProfile, User};
use crate::time_utils::{generate_id, now_rfc3339};

const USER_COLUMNS: &str =
    "id, github_id, username, email, avatar_url, name, created_at, last_login";

impl Database {
    /// Get a user by internal id.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    /// Get a user by GitHub id.
    pub async fn find_user_by_github_id(&self, github_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE github_id = ?"
        ))
        .bind(github_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    /// Create or refresh the user behind a GitHub profile.
    ///
    /// Existing users keep their internal id and `created_at`; profile fields
    /// and `last_login` are overwritten. One statement, so concurrent first
    /// sign-ins for the same account converge on a single row.
    pub async fn upsert_user_from_profile(&self, profile: &GithubProfile) -> Result<User, AppError> {
        let now = now_rfc3339();
        let new_id = generate_id();

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (github_id) DO UPDATE SET
                 username = excluded.username,
                 email = excluded.email,
                 avatar_url = excluded.avatar_url,
                 name = excluded.name,
                 last_login = excluded.last_login
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_id)
        .bind(&profile.github_id)
        .bind(&profile.username)
        .bind(&profile.email)
        .bind(&profile.avatar_url)
        .bind(&profile.name)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.pool())
        .await?;

        if user.id == new_id {
            tracing::info!(user_id = %user.id, github_id = %user.github_id, "New user created");
        } else {
            tracing::info!(user_id = %user.id, github_id = %user.github_id, "User signed in");
        }
        Ok(user)
    }
}
