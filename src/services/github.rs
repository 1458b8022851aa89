// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub OAuth client.
//!
//! Handles:
//! - Authorization code exchange
//! - Profile fetch with the mandatory `User-Agent`
//! - Best-effort email lookup when the profile hides it

use crate::config::GithubEndpoints;
use crate::error::AppError;
use crate::models::GithubProfile;
use serde::Deserialize;

/// GitHub rejects API calls without a `User-Agent`.
pub const USER_AGENT: &str = "Recipe-Saver-App";

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    oauth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
}

/// How the profile's email was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailStatus {
    /// The profile exposed a public email.
    Public,
    /// Picked from `/user/emails` (primary, else first).
    FromEmailList,
    /// The lookup succeeded but returned no addresses.
    Unavailable,
    /// The lookup failed; the profile is still usable without an email.
    LookupFailed(String),
}

/// A successfully fetched profile plus how its email was resolved.
#[derive(Debug, Clone)]
pub struct ProfileFetch {
    pub profile: GithubProfile,
    pub email_status: EmailStatus,
}

impl GithubClient {
    /// Create a new GitHub client with OAuth credentials.
    pub fn new(endpoints: &GithubEndpoints, client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            oauth_url: endpoints.oauth_url.trim_end_matches('/').to_string(),
            api_url: endpoints.api_url.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    /// Exchange an authorization code for an access token.
    ///
    /// The provider's JSON body is authoritative: an `error` field fails the
    /// exchange regardless of HTTP status.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let url = format!("{}/login/oauth/access_token", self.oauth_url);

        let body = serde_json::json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret,
            "code": code,
        });

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Token exchange failed: {}", e)))?;

        let status = response.status();
        let token: TokenExchangeResponse = response.json().await.map_err(|e| {
            AppError::Upstream(format!(
                "Failed to parse token response (HTTP {}): {}",
                status, e
            ))
        })?;

        if let Some(error) = token.error {
            tracing::warn!(error = %error, "GitHub rejected authorization code");
            return Err(AppError::AuthenticationFailed(
                token.error_description.unwrap_or(error),
            ));
        }

        token.access_token.ok_or_else(|| {
            AppError::AuthenticationFailed("GitHub returned no access token".to_string())
        })
    }

    /// Fetch the authenticated user's profile.
    ///
    /// When the profile has no public email, `/user/emails` is consulted.
    /// That second call never fails the fetch; its outcome is reported in
    /// [`ProfileFetch::email_status`].
    pub async fn fetch_profile(&self, access_token: &str) -> Result<ProfileFetch, AppError> {
        let url = format!("{}/user", self.api_url);
        let user: GithubUser = self.get_json(&url, access_token).await?;

        let github_id = match user.id {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s,
            other => {
                return Err(AppError::Upstream(format!(
                    "Unexpected GitHub user id: {}",
                    other
                )))
            }
        };

        let (email, email_status) = match user.email.filter(|e| !e.is_empty()) {
            Some(email) => (Some(email), EmailStatus::Public),
            None => match self.fetch_primary_email(access_token).await {
                Ok(Some(email)) => (Some(email), EmailStatus::FromEmailList),
                Ok(None) => (None, EmailStatus::Unavailable),
                Err(e) => {
                    tracing::warn!(error = %e, github_id = %github_id, "Email lookup failed, continuing without email");
                    (None, EmailStatus::LookupFailed(e.to_string()))
                }
            },
        };

        Ok(ProfileFetch {
            profile: GithubProfile {
                github_id,
                username: user.login,
                email,
                avatar_url: user.avatar_url,
                name: user.name,
            },
            email_status,
        })
    }

    /// Primary address from `/user/emails`, else the first one listed.
    async fn fetch_primary_email(&self, access_token: &str) -> Result<Option<String>, AppError> {
        let url = format!("{}/user/emails", self.api_url);
        let emails: Vec<GithubEmail> = self.get_json(&url, access_token).await?;

        let chosen = emails
            .iter()
            .find(|e| e.primary)
            .or_else(|| emails.first())
            .map(|e| e.email.clone());
        Ok(chosen)
    }

    /// Authenticated GET with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, url, "GitHub API request failed");
            return Err(AppError::Upstream(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))
    }
}

/// Token exchange response from GitHub OAuth.
#[derive(Debug, Clone, Deserialize)]
struct TokenExchangeResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Subset of `GET /user`.
#[derive(Debug, Clone, Deserialize)]
struct GithubUser {
    /// Numeric on github.com; kept loose so string ids also work.
    id: serde_json::Value,
    login: String,
    email: Option<String>,
    avatar_url: Option<String>,
    name: Option<String>,
}

/// Entry of `GET /user/emails`.
#[derive(Debug, Clone, Deserialize)]
struct GithubEmail {
    email: String,
    #[serde(default)]
    primary: bool,
}
