// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! GraphQL resolvers either fold an [`AppError`] into a
//! `{success: false, error}` payload or raise it with a stable
//! `extensions.code`.

use async_graphql::ErrorExtensions;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("GitHub API error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, exposed in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AuthenticationRequired => "UNAUTHENTICATED",
            AppError::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION",
            AppError::Upstream(_) => "UPSTREAM_FAILURE",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Message handed to clients in `{success: false, error}` payloads.
    ///
    /// Storage and internal failures are logged here and replaced by a
    /// generic message.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Database error".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Validation("a record with this id already exists".to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(format!("Migration failed: {}", err))
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.client_message()).extend_with(|_, e| e.set("code", code))
    }
}
