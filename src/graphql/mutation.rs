// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mutation resolvers. Failures are reported in the payload, never raised.

use super::types::{AuthResponse, ImportResponse, RecipeResponse};
use super::{app_state, viewer};
use crate::models::{RecipeInput, RecipeUpdateInput};
use crate::services::authenticate_github;
use async_graphql::{Context, Object, Result, ID};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[graphql(name = "authenticateGitHub")]
    async fn authenticate_github(&self, ctx: &Context<'_>, code: String) -> Result<AuthResponse> {
        let state = app_state(ctx)?;
        Ok(match authenticate_github(state, &code).await {
            Ok(sign_in) => AuthResponse::signed_in(sign_in),
            Err(e) => {
                tracing::warn!(error = %e, "GitHub sign-in failed");
                AuthResponse::failed(&e)
            }
        })
    }

    /// Save a recipe, owned by the caller when signed in.
    async fn create_recipe(&self, ctx: &Context<'_>, input: RecipeInput) -> Result<RecipeResponse> {
        let state = app_state(ctx)?;
        let owner = viewer(ctx).map(|v| v.user_id.as_str());
        Ok(match state.db.create_recipe(&input, owner).await {
            Ok(recipe) => RecipeResponse::saved(recipe),
            Err(e) => RecipeResponse::failed(&e),
        })
    }

    async fn update_recipe(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: RecipeUpdateInput,
    ) -> Result<RecipeResponse> {
        let state = app_state(ctx)?;
        Ok(match state.db.update_recipe(&id, &input).await {
            Ok(recipe) => RecipeResponse::saved(recipe),
            Err(e) => RecipeResponse::failed(&e),
        })
    }

    async fn delete_recipe(&self, ctx: &Context<'_>, id: ID) -> Result<RecipeResponse> {
        let state = app_state(ctx)?;
        Ok(match state.db.delete_recipe(&id).await {
            Ok(()) => RecipeResponse::deleted(id),
            Err(e) => RecipeResponse::failed(&e),
        })
    }

    /// Bulk import, skipping recipes whose URL is already stored.
    async fn import_recipes(
        &self,
        ctx: &Context<'_>,
        recipes: Vec<RecipeInput>,
    ) -> Result<ImportResponse> {
        let state = app_state(ctx)?;
        Ok(match state.db.import_recipes(&recipes).await {
            Ok(count) => ImportResponse::completed(count),
            Err(e) => ImportResponse::failed(&e),
        })
    }
}
