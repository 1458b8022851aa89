// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GraphQL schema.
//!
//! Resolvers reach shared state and the request's [`Viewer`] through the
//! async-graphql context. Gated queries raise errors carrying
//! `extensions.code`; mutations fold failures into their payloads.

pub mod mutation;
pub mod query;
pub mod types;

use crate::error::AppError;
use crate::middleware::{AuthUser, Viewer};
use crate::AppState;
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema};
use std::sync::Arc;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::{AuthResponse, ImportResponse, RecipeResponse};

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with `state` available to every resolver.
pub fn build_schema(state: Arc<AppState>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

fn app_state<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Arc<AppState>> {
    ctx.data::<Arc<AppState>>()
}

/// The caller, if the request carried a valid session token.
fn viewer<'a>(ctx: &Context<'a>) -> Option<&'a AuthUser> {
    ctx.data_opt::<Viewer>().and_then(Viewer::user)
}

fn require_viewer<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a AuthUser> {
    ctx.data_opt::<Viewer>()
        .ok_or(AppError::AuthenticationRequired)
        .and_then(Viewer::require)
        .map_err(|e| e.extend())
}
