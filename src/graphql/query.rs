// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query resolvers.

use super::{app_state, require_viewer};
use crate::models::{Recipe, RecipeStats, User};
use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

pub const HEALTH_MESSAGE: &str = "Recipe Saver GraphQL API is running";

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn health(&self) -> &'static str {
        HEALTH_MESSAGE
    }

    /// Every recipe, newest first. Requires a session.
    async fn recipes(&self, ctx: &Context<'_>) -> Result<Vec<Recipe>> {
        require_viewer(ctx)?;
        app_state(ctx)?
            .db
            .list_recipes()
            .await
            .map_err(|e| e.extend())
    }

    async fn recipe(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Recipe>> {
        app_state(ctx)?
            .db
            .get_recipe(&id)
            .await
            .map_err(|e| e.extend())
    }

    async fn search_recipes(&self, ctx: &Context<'_>, query: String) -> Result<Vec<Recipe>> {
        app_state(ctx)?
            .db
            .search_recipes(&query)
            .await
            .map_err(|e| e.extend())
    }

    /// Requires a session.
    async fn stats(&self, ctx: &Context<'_>) -> Result<RecipeStats> {
        require_viewer(ctx)?;
        app_state(ctx)?
            .db
            .recipe_stats()
            .await
            .map_err(|e| e.extend())
    }

    /// The signed-in user; null if the account no longer exists.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let viewer = require_viewer(ctx)?;
        app_state(ctx)?
            .db
            .get_user(&viewer.user_id)
            .await
            .map_err(|e| e.extend())
    }
}
