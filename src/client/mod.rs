// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed client for the GraphQL API.
//!
//! Every call takes the caller's [`Session`] and sends its token as a bearer
//! header when present.

mod session;

pub use session::{LoginConfig, Session};

use crate::models::{Recipe, RecipeInput, RecipeStats, RecipeUpdateInput, User};
use crate::services::extract_recipe;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// Appends the `RecipeFields` fragment used by every recipe-returning document.
macro_rules! with_recipe_fields {
    ($document:literal) => {
        concat!(
            $document,
            "\nfragment RecipeFields on Recipe {\n",
            "  id title description ingredients instructions prepTime cookTime totalTime\n",
            "  servings category cuisine image author url source dateAdded dateModified userId\n",
            "}\n"
        )
    };
}

const LIST_RECIPES: &str = with_recipe_fields!("query Recipes { recipes { ...RecipeFields } }");

const GET_RECIPE: &str =
    with_recipe_fields!("query Recipe($id: ID!) { recipe(id: $id) { ...RecipeFields } }");

const SEARCH_RECIPES: &str = with_recipe_fields!(
    "query SearchRecipes($query: String!) { searchRecipes(query: $query) { ...RecipeFields } }"
);

const CREATE_RECIPE: &str = with_recipe_fields!(
    "mutation CreateRecipe($input: RecipeInput!) {
  createRecipe(input: $input) { success id error recipe { ...RecipeFields } }
}"
);

const UPDATE_RECIPE: &str = with_recipe_fields!(
    "mutation UpdateRecipe($id: ID!, $input: RecipeUpdateInput!) {
  updateRecipe(id: $id, input: $input) { success id error recipe { ...RecipeFields } }
}"
);

const DELETE_RECIPE: &str =
    "mutation DeleteRecipe($id: ID!) { deleteRecipe(id: $id) { success id error } }";

const IMPORT_RECIPES: &str = "mutation ImportRecipes($recipes: [RecipeInput!]!) {
  importRecipes(recipes: $recipes) { success imported error }
}";

const STATS: &str = "query Stats { stats { totalRecipes categories cuisines } }";

const USER_FIELDS: &str = "id githubId username email avatarUrl name createdAt lastLogin";

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// First entry of the response's `errors` list, with its
    /// `extensions.code` when present.
    #[error("{message}")]
    GraphQl {
        message: String,
        code: Option<String>,
    },

    /// A mutation answered `{success: false, error}`.
    #[error("{0}")]
    Rejected(String),

    #[error("Invalid state parameter")]
    StateMismatch,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response contained no data")]
    MissingData,

    #[error("Random number generation failed")]
    Random,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Deserialize)]
struct GraphQlErrorExtensions {
    code: Option<String>,
}

impl ClientError {
    /// The server rejected the session token.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ClientError::GraphQl { code: Some(code), .. } if code == "UNAUTHENTICATED")
    }
}

#[derive(Deserialize)]
struct RecipePayload {
    success: bool,
    recipe: Option<Recipe>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ImportPayload {
    success: bool,
    imported: u64,
    error: Option<String>,
}

#[derive(Deserialize)]
struct AuthPayload {
    success: bool,
    token: Option<String>,
    user: Option<User>,
    error: Option<String>,
}

fn rejected(error: Option<String>, fallback: &str) -> ClientError {
    ClientError::Rejected(error.unwrap_or_else(|| fallback.to_string()))
}

impl RecipePayload {
    fn into_recipe(self) -> Result<Recipe, ClientError> {
        if !self.success {
            return Err(rejected(self.error, "Request failed"));
        }
        self.recipe.ok_or(ClientError::MissingData)
    }
}

/// Client for one GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct RecipeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RecipeClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// POST one document and decode `data`.
    async fn execute<T: DeserializeOwned>(
        &self,
        session: &Session,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ClientError> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = session.token() {
            request = request.bearer_auth(token);
        }

        let response: GraphQlResponse<T> = request.send().await?.error_for_status()?.json().await?;

        if let Some(error) = response.errors.into_iter().next() {
            tracing::debug!(message = %error.message, "GraphQL error");
            return Err(ClientError::GraphQl {
                message: error.message,
                code: error.extensions.and_then(|ext| ext.code),
            });
        }
        response.data.ok_or(ClientError::MissingData)
    }

    pub async fn save_recipe(
        &self,
        session: &Session,
        input: &RecipeInput,
    ) -> Result<Recipe, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            create_recipe: RecipePayload,
        }

        let data: Data = self
            .execute(session, CREATE_RECIPE, json!({ "input": input }))
            .await?;
        data.create_recipe.into_recipe()
    }

    /// All recipes, newest first. Requires a signed-in session.
    pub async fn recipes(&self, session: &Session) -> Result<Vec<Recipe>, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            recipes: Vec<Recipe>,
        }

        let data: Data = self.execute(session, LIST_RECIPES, json!({})).await?;
        Ok(data.recipes)
    }

    pub async fn recipe(&self, session: &Session, id: &str) -> Result<Option<Recipe>, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            recipe: Option<Recipe>,
        }

        let data: Data = self.execute(session, GET_RECIPE, json!({ "id": id })).await?;
        Ok(data.recipe)
    }

    pub async fn update_recipe(
        &self,
        session: &Session,
        id: &str,
        input: &RecipeUpdateInput,
    ) -> Result<Recipe, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            update_recipe: RecipePayload,
        }

        let data: Data = self
            .execute(session, UPDATE_RECIPE, json!({ "id": id, "input": input }))
            .await?;
        data.update_recipe.into_recipe()
    }

    pub async fn delete_recipe(&self, session: &Session, id: &str) -> Result<(), ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            delete_recipe: RecipePayload,
        }

        let data: Data = self
            .execute(session, DELETE_RECIPE, json!({ "id": id }))
            .await?;
        if data.delete_recipe.success {
            Ok(())
        } else {
            Err(rejected(data.delete_recipe.error, "Delete failed"))
        }
    }

    pub async fn search_recipes(
        &self,
        session: &Session,
        query: &str,
    ) -> Result<Vec<Recipe>, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            search_recipes: Vec<Recipe>,
        }

        let data: Data = self
            .execute(session, SEARCH_RECIPES, json!({ "query": query }))
            .await?;
        Ok(data.search_recipes)
    }

    /// Requires a signed-in session.
    pub async fn stats(&self, session: &Session) -> Result<RecipeStats, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            stats: RecipeStats,
        }

        let data: Data = self.execute(session, STATS, json!({})).await?;
        Ok(data.stats)
    }

    /// Import a JSON array of recipes, such as one written by
    /// [`export_json`](Self::export_json). Returns how many were stored.
    pub async fn import_json(&self, session: &Session, json_text: &str) -> Result<u64, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            import_recipes: ImportPayload,
        }

        let recipes: Vec<RecipeInput> = serde_json::from_str(json_text)?;
        tracing::info!(count = recipes.len(), "Importing recipes");

        let data: Data = self
            .execute(session, IMPORT_RECIPES, json!({ "recipes": recipes }))
            .await?;
        let payload = data.import_recipes;
        if !payload.success {
            return Err(rejected(payload.error, "Import failed"));
        }
        Ok(payload.imported)
    }

    /// Every recipe as pretty-printed JSON.
    pub async fn export_json(&self, session: &Session) -> Result<String, ClientError> {
        let recipes = self.recipes(session).await?;
        Ok(serde_json::to_string_pretty(&recipes)?)
    }

    /// Finish a GitHub sign-in started with [`Session::begin_login`].
    ///
    /// `state` must match the one the session generated; on success the
    /// session holds the new token.
    pub async fn authenticate_github(
        &self,
        session: &mut Session,
        code: &str,
        state: &str,
    ) -> Result<User, ClientError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            authenticate_git_hub: AuthPayload,
        }

        session.check_state(state)?;

        let query = format!(
            "mutation AuthenticateGitHub($code: String!) {{
  authenticateGitHub(code: $code) {{ success token error user {{ {USER_FIELDS} }} }}
}}"
        );
        let data: Data = self.execute(session, &query, json!({ "code": code })).await?;
        let payload = data.authenticate_git_hub;
        if !payload.success {
            return Err(rejected(payload.error, "Authentication failed"));
        }

        let (Some(token), Some(user)) = (payload.token, payload.user) else {
            return Err(ClientError::MissingData);
        };
        session.set_token(token);
        Ok(user)
    }

    /// The signed-in user, or `None` without a session.
    ///
    /// A session the server rejects is cleared.
    pub async fn current_user(&self, session: &mut Session) -> Result<Option<User>, ClientError> {
        #[derive(Deserialize)]
        struct Data {
            me: Option<User>,
        }

        if !session.is_authenticated() {
            return Ok(None);
        }

        let query = format!("query Me {{ me {{ {USER_FIELDS} }} }}");
        match self.execute::<Data>(session, &query, json!({})).await {
            Ok(data) => Ok(data.me),
            Err(e) if e.is_unauthenticated() => {
                tracing::info!(error = %e, "Session rejected, logging out");
                session.clear();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Extract a recipe from a page and save it. `None` if the page has no
    /// recognizable recipe.
    pub async fn save_page(
        &self,
        session: &Session,
        html: &str,
        page_url: &str,
    ) -> Result<Option<Recipe>, ClientError> {
        let Some(input) = extract_recipe(html, page_url) else {
            tracing::debug!(page_url, "No recipe found on page");
            return Ok(None);
        };
        self.save_recipe(session, &input).await.map(Some)
    }
}
