// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Recipe Saver: bookmark recipes from the web
//!
//! This crate provides the GraphQL backend that stores recipes extracted
//! from web pages, GitHub sign-in with signed session tokens, and a typed
//! client for the API.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::{GithubClient, TokenCodec};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub github: GithubClient,
    pub tokens: TokenCodec,
}

impl AppState {
    /// Wire services from `config` around an open database.
    pub fn new(config: Config, db: Database) -> Self {
        let github = GithubClient::new(
            &config.github,
            config.github_client_id.clone(),
            config.github_client_secret.clone(),
        );
        let tokens = TokenCodec::new(config.jwt_secret.clone());
        Self {
            config,
            db,
            github,
            tokens,
        }
    }
}
