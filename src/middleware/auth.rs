// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token middleware.
//!
//! Resolves the caller from the `Authorization` header. Requests without a
//! valid token proceed anonymously; operations that need a user reject them
//! later via [`Viewer::require`].

use crate::error::AppError;
use crate::services::SessionClaims;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user extracted from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub github_id: String,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            github_id: claims.github_id,
        }
    }
}

/// The caller of a request, if signed in.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<AuthUser>);

impl Viewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.0.as_ref()
    }

    /// The signed-in user, or `AuthenticationRequired`.
    pub fn require(&self) -> Result<&AuthUser, AppError> {
        self.0.as_ref().ok_or(AppError::AuthenticationRequired)
    }
}

/// Token carried by an `Authorization` header.
///
/// Accepts `Bearer <token>` (scheme matched case-insensitively, any run of
/// whitespace after it) or a bare token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let token = match value.trim_start().split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value.trim(),
    };

    (!token.is_empty()).then_some(token)
}

/// Middleware that attaches a [`Viewer`] to every request.
pub async fn resolve_viewer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer = match bearer_token(request.headers()) {
        None => Viewer::anonymous(),
        Some(token) => match state.tokens.verify::<SessionClaims>(token) {
            Ok(claims) => Viewer(Some(claims.into())),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
                Viewer::anonymous()
            }
        },
    };

    request.extensions_mut().insert(viewer);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_forms() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer\tabc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("BEARER   abc.def.ghi ")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_require_anonymous() {
        assert!(matches!(
            Viewer::anonymous().require(),
            Err(AppError::AuthenticationRequired)
        ));
    }
}
