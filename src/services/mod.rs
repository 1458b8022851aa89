// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod extract;
pub mod github;
pub mod token;

pub use auth::{authenticate_github, SignIn};
pub use extract::extract_recipe;
pub use github::{EmailStatus, GithubClient, ProfileFetch};
pub use token::{SessionClaims, TokenCodec, TokenError};
