// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub sign-in: code exchange, profile fetch, user upsert, session token.

use crate::error::AppError;
use crate::models::User;
use crate::services::github::EmailStatus;
use crate::services::token::SessionClaims;
use crate::AppState;

/// A signed-in user and their session token.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub token: String,
    pub user: User,
}

/// Complete a GitHub OAuth sign-in for an authorization `code`.
pub async fn authenticate_github(state: &AppState, code: &str) -> Result<SignIn, AppError> {
    tracing::info!("Exchanging GitHub authorization code");

    let access_token = state.github.exchange_code(code).await?;
    let fetched = state.github.fetch_profile(&access_token).await?;

    if let EmailStatus::LookupFailed(reason) = &fetched.email_status {
        tracing::info!(
            github_id = %fetched.profile.github_id,
            reason = %reason,
            "Signing in without email"
        );
    }

    let user = state.db.upsert_user_from_profile(&fetched.profile).await?;

    let claims = SessionClaims::issue(&user, chrono::Utc::now());
    let token = state
        .tokens
        .sign(&claims)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token signing failed: {}", e)))?;

    tracing::info!(user_id = %user.id, username = %user.username, "GitHub sign-in complete");

    Ok(SignIn { token, user })
}
