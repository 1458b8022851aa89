// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe model for storage and API.

use async_graphql::{InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

/// A saved recipe.
///
/// `ingredients` and `instructions` are stored as JSON text but always
/// materialized as sequences here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[graphql(complex)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    /// Exposed as `ID!` by the complex resolver
    #[graphql(skip)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub servings: String,
    pub category: String,
    pub cuisine: String,
    pub image: String,
    pub author: String,
    pub url: String,
    pub source: String,
    pub date_added: String,
    pub date_modified: String,
    /// Soft reference to [`super::User::id`]
    pub user_id: Option<String>,
}

/// Input for creating or importing a recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, InputObject)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeInput {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub servings: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub date_added: Option<String>,
}

/// Input for updating a recipe. Absent fields are stored as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, InputObject)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeUpdateInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub servings: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
}

impl From<Recipe> for RecipeUpdateInput {
    fn from(recipe: Recipe) -> Self {
        Self {
            title: Some(recipe.title),
            description: Some(recipe.description),
            ingredients: Some(recipe.ingredients),
            instructions: Some(recipe.instructions),
            prep_time: Some(recipe.prep_time),
            cook_time: Some(recipe.cook_time),
            total_time: Some(recipe.total_time),
            servings: Some(recipe.servings),
            category: Some(recipe.category),
            cuisine: Some(recipe.cuisine),
            image: Some(recipe.image),
            author: Some(recipe.author),
            url: Some(recipe.url),
            source: Some(recipe.source),
        }
    }
}

/// Aggregate numbers over the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "Stats")]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeStats {
    pub total_recipes: i64,
    pub categories: Vec<String>,
    pub cuisines: Vec<String>,
}
