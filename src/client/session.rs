// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side session: the bearer token and a pending OAuth `state`.
//!
//! A [`Session`] is created at startup, filled by a successful sign-in and
//! cleared on logout. Callers own it and pass it to every request.

use super::ClientError;
use ring::rand::{SecureRandom, SystemRandom};

const DEFAULT_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const OAUTH_SCOPE: &str = "user:email";
const STATE_BYTES: usize = 16;

/// Parameters of the GitHub authorize redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub authorize_url: String,
}

impl LoginConfig {
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    pending_state: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session resumed from a previously stored token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            pending_state: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Start a sign-in: remember a fresh random `state` and return the URL
    /// the user should be sent to.
    pub fn begin_login(&mut self, config: &LoginConfig) -> Result<String, ClientError> {
        let mut bytes = [0u8; STATE_BYTES];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| ClientError::Random)?;
        let state = hex::encode(bytes);

        let url = format!(
            "{}?client_id={}&redirect_uri={}&state={}&scope={}",
            config.authorize_url,
            urlencoding::encode(&config.client_id),
            urlencoding::encode(&config.redirect_uri),
            state,
            urlencoding::encode(OAUTH_SCOPE),
        );

        self.pending_state = Some(state);
        Ok(url)
    }

    /// Consume the pending `state`, failing unless it equals `returned`.
    pub(crate) fn check_state(&mut self, returned: &str) -> Result<(), ClientError> {
        match self.pending_state.take() {
            Some(expected) if expected == returned => Ok(()),
            _ => Err(ClientError::StateMismatch),
        }
    }

    pub(crate) fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Log out. Tokens are not revocable, so this only forgets it.
    pub fn clear(&mut self) {
        self.token = None;
        self.pending_state = None;
    }
}
