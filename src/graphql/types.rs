// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mutation payloads and computed fields.

use super::app_state;
use crate::error::AppError;
use crate::models::{Recipe, User};
use crate::services::SignIn;
use async_graphql::{ComplexObject, Context, ErrorExtensions, SimpleObject, ID};

/// Result of `authenticateGitHub`.
#[derive(Debug, Clone, Default, SimpleObject)]
pub struct AuthResponse {
    pub success: bool,
    pub token: Option<String>,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl AuthResponse {
    pub fn signed_in(sign_in: SignIn) -> Self {
        Self {
            success: true,
            token: Some(sign_in.token),
            user: Some(sign_in.user),
            error: None,
        }
    }

    pub fn failed(err: &AppError) -> Self {
        Self {
            error: Some(err.client_message()),
            ..Self::default()
        }
    }
}

/// Result of the single-recipe mutations.
#[derive(Debug, Clone, Default, SimpleObject)]
pub struct RecipeResponse {
    pub success: bool,
    pub id: Option<ID>,
    pub recipe: Option<Recipe>,
    pub error: Option<String>,
}

impl RecipeResponse {
    pub fn saved(recipe: Recipe) -> Self {
        Self {
            success: true,
            id: Some(ID(recipe.id.clone())),
            recipe: Some(recipe),
            error: None,
        }
    }

    pub fn deleted(id: ID) -> Self {
        Self {
            success: true,
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn failed(err: &AppError) -> Self {
        Self {
            error: Some(err.client_message()),
            ..Self::default()
        }
    }
}

/// Result of `importRecipes`.
#[derive(Debug, Clone, Default, SimpleObject)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: i32,
    pub error: Option<String>,
}

impl ImportResponse {
    pub fn completed(count: u64) -> Self {
        Self {
            success: true,
            imported: i32::try_from(count).unwrap_or(i32::MAX),
            error: None,
        }
    }

    pub fn failed(err: &AppError) -> Self {
        Self {
            error: Some(err.client_message()),
            ..Self::default()
        }
    }
}

#[ComplexObject]
impl Recipe {
    async fn id(&self) -> ID {
        ID(self.id.clone())
    }

    /// Owner, resolved at read time. Dangling references resolve to null.
    async fn user(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<User>> {
        let Some(user_id) = self.user_id.as_deref() else {
            return Ok(None);
        };
        app_state(ctx)?
            .db
            .get_user(user_id)
            .await
            .map_err(|e| e.extend())
    }
}
