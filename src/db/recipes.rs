// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe store.
//!
//! Each operation is a single statement (or one transaction for imports);
//! nothing spans operations. Ownership is recorded but never enforced here.

use super::Database;
use crate::error::AppError;
use crate::models::{Recipe, RecipeInput, RecipeStats, RecipeUpdateInput};
use crate::time_utils::{generate_id, now_rfc3339};
use std::collections::HashSet;

const RECIPE_COLUMNS: &str = "id, title, description, ingredients, instructions, \
     prep_time, cook_time, total_time, servings, category, cuisine, image, author, \
     url, source, date_added, date_modified, user_id";

/// Row shape of the `recipes` table, list fields still JSON-encoded.
#[derive(sqlx::FromRow)]
struct RecipeRow {
    id: String,
    title: String,
    description: String,
    ingredients: String,
    instructions: String,
    prep_time: String,
    cook_time: String,
    total_time: String,
    servings: String,
    category: String,
    cuisine: String,
    image: String,
    author: String,
    url: String,
    source: String,
    date_added: String,
    date_modified: String,
    user_id: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        let ingredients = decode_list(&row.id, "ingredients", &row.ingredients);
        let instructions = decode_list(&row.id, "instructions", &row.instructions);
        Recipe {
            id: row.id,
            title: row.title,
            description: row.description,
            ingredients,
            instructions,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
            total_time: row.total_time,
            servings: row.servings,
            category: row.category,
            cuisine: row.cuisine,
            image: row.image,
            author: row.author,
            url: row.url,
            source: row.source,
            date_added: row.date_added,
            date_modified: row.date_modified,
            user_id: row.user_id,
        }
    }
}

/// Decode a JSON text column into a list, treating corrupt text as empty.
fn decode_list(recipe_id: &str, column: &'static str, raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(recipe_id, column, error = %e, "Corrupt list column, using empty list");
        Vec::new()
    })
}

fn encode_list(items: &[String]) -> Result<String, AppError> {
    serde_json::to_string(items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode list: {}", e)))
}

/// Escape `LIKE` wildcards so the search text matches literally.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl Database {
    /// Insert a recipe. `owner` is the authenticated caller, if any.
    pub async fn create_recipe(
        &self,
        input: &RecipeInput,
        owner: Option<&str>,
    ) -> Result<Recipe, AppError> {
        let now = now_rfc3339();
        let recipe = Recipe {
            id: input
                .id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generate_id),
            date_added: input
                .date_added
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| now.clone()),
            date_modified: now,
            user_id: owner.map(String::from),
            ..recipe_from_input(input)
        };

        self.insert_recipe(&recipe).await?;
        tracing::info!(recipe_id = %recipe.id, owner = ?recipe.user_id, "Recipe created");
        Ok(recipe)
    }

    async fn insert_recipe(&self, recipe: &Recipe) -> Result<(), AppError> {
        let mut conn = self.pool().acquire().await?;
        insert_recipe_with(&mut *conn, recipe).await
    }

    /// Get a recipe by id.
    pub async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>, AppError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(Recipe::from))
    }

    /// Replace every editable field of a recipe.
    ///
    /// `id`, `date_added` and `user_id` are preserved; absent input fields
    /// become empty.
    pub async fn update_recipe(
        &self,
        id: &str,
        input: &RecipeUpdateInput,
    ) -> Result<Recipe, AppError> {
        if !self.recipe_exists(id).await? {
            return Err(AppError::NotFound("Recipe not found".to_string()));
        }

        let ingredients = encode_list(input.ingredients.as_deref().unwrap_or_default())?;
        let instructions = encode_list(input.instructions.as_deref().unwrap_or_default())?;
        let text = |field: &Option<String>| field.clone().unwrap_or_default();

        sqlx::query(
            "UPDATE recipes SET
                title = ?, description = ?, ingredients = ?, instructions = ?,
                prep_time = ?, cook_time = ?, total_time = ?, servings = ?,
                category = ?, cuisine = ?, image = ?, author = ?, url = ?, source = ?,
                date_modified = ?
             WHERE id = ?",
        )
        .bind(text(&input.title))
        .bind(text(&input.description))
        .bind(ingredients)
        .bind(instructions)
        .bind(text(&input.prep_time))
        .bind(text(&input.cook_time))
        .bind(text(&input.total_time))
        .bind(text(&input.servings))
        .bind(text(&input.category))
        .bind(text(&input.cuisine))
        .bind(text(&input.image))
        .bind(text(&input.author))
        .bind(text(&input.url))
        .bind(text(&input.source))
        .bind(now_rfc3339())
        .bind(id)
        .execute(self.pool())
        .await?;

        tracing::info!(recipe_id = id, "Recipe updated");

        // A concurrent delete between the update and this read is possible.
        self.get_recipe(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))
    }

    /// Delete a recipe by id.
    pub async fn delete_recipe(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe not found".to_string()));
        }

        tracing::info!(recipe_id = id, "Recipe deleted");
        Ok(())
    }

    async fn recipe_exists(&self, id: &str) -> Result<bool, AppError> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(found.is_some())
    }

    /// All recipes, newest first.
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, AppError> {
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY date_added DESC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Case-insensitive substring search, newest first.
    ///
    /// Matches title, description, category, cuisine or the raw JSON text of
    /// the ingredients column. SQLite's `LIKE` folds ASCII letters only;
    /// other characters match exactly.
    pub async fn search_recipes(&self, text: &str) -> Result<Vec<Recipe>, AppError> {
        let pattern = like_pattern(text);
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes
             WHERE title LIKE ?1 ESCAPE '\\'
                OR description LIKE ?1 ESCAPE '\\'
                OR category LIKE ?1 ESCAPE '\\'
                OR cuisine LIKE ?1 ESCAPE '\\'
                OR ingredients LIKE ?1 ESCAPE '\\'
             ORDER BY date_added DESC"
        ))
        .bind(pattern)
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Import a batch of recipes, skipping any whose non-empty URL is already
    /// stored. Returns how many were inserted.
    ///
    /// Imported recipes get fresh ids and timestamps and no owner. The batch
    /// is one transaction.
    pub async fn import_recipes(&self, batch: &[RecipeInput]) -> Result<u64, AppError> {
        let mut tx = self.pool().begin().await?;

        let existing: HashSet<String> =
            sqlx::query_scalar::<_, String>("SELECT url FROM recipes WHERE url != ''")
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();

        let mut imported = 0u64;
        for input in batch {
            let url = input.url.clone().unwrap_or_default();
            if !url.is_empty() && existing.contains(&url) {
                tracing::debug!(url = %url, "Skipping already-saved recipe");
                continue;
            }

            let now = now_rfc3339();
            let recipe = Recipe {
                id: generate_id(),
                date_added: now.clone(),
                date_modified: now,
                user_id: None,
                ..recipe_from_input(input)
            };
            insert_recipe_with(&mut *tx, &recipe).await?;
            imported += 1;
        }

        tx.commit().await?;
        tracing::info!(imported, submitted = batch.len(), "Recipes imported");
        Ok(imported)
    }

    /// Totals and the distinct non-empty categories and cuisines.
    pub async fn recipe_stats(&self) -> Result<RecipeStats, AppError> {
        let total_recipes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(self.pool())
            .await?;
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM recipes WHERE category != '' ORDER BY category",
        )
        .fetch_all(self.pool())
        .await?;
        let cuisines: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT cuisine FROM recipes WHERE cuisine != '' ORDER BY cuisine",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(RecipeStats {
            total_recipes,
            categories,
            cuisines,
        })
    }
}

/// Field mapping shared by create and import; id and timestamps are left
/// for the caller.
fn recipe_from_input(input: &RecipeInput) -> Recipe {
    Recipe {
        title: input.title.clone(),
        description: input.description.clone().unwrap_or_default(),
        ingredients: input.ingredients.clone(),
        instructions: input.instructions.clone(),
        prep_time: input.prep_time.clone().unwrap_or_default(),
        cook_time: input.cook_time.clone().unwrap_or_default(),
        total_time: input.total_time.clone().unwrap_or_default(),
        servings: input.servings.clone().unwrap_or_default(),
        category: input.category.clone().unwrap_or_default(),
        cuisine: input.cuisine.clone().unwrap_or_default(),
        image: input.image.clone().unwrap_or_default(),
        author: input.author.clone().unwrap_or_default(),
        url: input.url.clone().unwrap_or_default(),
        source: input.source.clone().unwrap_or_default(),
        ..Recipe::default()
    }
}

async fn insert_recipe_with(
    conn: &mut sqlx::SqliteConnection,
    recipe: &Recipe,
) -> Result<(), AppError> {
    sqlx::query(&format!(
        "INSERT INTO recipes ({RECIPE_COLUMNS})
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(&recipe.id)
    .bind(&recipe.title)
    .bind(&recipe.description)
    .bind(encode_list(&recipe.ingredients)?)
    .bind(encode_list(&recipe.instructions)?)
    .bind(&recipe.prep_time)
    .bind(&recipe.cook_time)
    .bind(&recipe.total_time)
    .bind(&recipe.servings)
    .bind(&recipe.category)
    .bind(&recipe.cuisine)
    .bind(&recipe.image)
    .bind(&recipe.author)
    .bind(&recipe.url)
    .bind(&recipe.source)
    .bind(&recipe.date_added)
    .bind(&recipe.date_modified)
    .bind(&recipe.user_id)
    .execute(conn)
    .await?;
    Ok(())
}
