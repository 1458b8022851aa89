// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe extraction from web pages.
//!
//! Two strategies, first success wins:
//! 1. schema.org `Recipe` objects in `application/ld+json` blocks
//! 2. common recipe-site HTML patterns (title + ingredient/instruction lists)

use crate::models::RecipeInput;
use crate::time_utils::now_rfc3339;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

const TITLE_SELECTORS: &[&str] = &["h1", ".recipe-title", "title"];

const INGREDIENT_SELECTORS: &[&str] = &[
    ".ingredient",
    ".recipe-ingredient",
    r#"[itemprop="recipeIngredient"]"#,
    "li.ingredient-item",
];

const INSTRUCTION_SELECTORS: &[&str] = &[
    ".instruction",
    ".recipe-instruction",
    r#"[itemprop="recipeInstructions"]"#,
    ".step",
];

/// Where the page came from, stamped onto every extracted recipe.
struct PageInfo {
    url: String,
    hostname: String,
    extracted_at: String,
}

impl PageInfo {
    fn new(page_url: &str) -> Self {
        let hostname = url::Url::parse(page_url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_default();
        Self {
            url: page_url.to_string(),
            hostname,
            extracted_at: now_rfc3339(),
        }
    }
}

/// Extract a recipe from a page's HTML, or `None` if the page has none.
///
/// `page_url` becomes the recipe's `url`; its hostname becomes `source`.
pub fn extract_recipe(html: &str, page_url: &str) -> Option<RecipeInput> {
    let document = Html::parse_document(html);
    let page = PageInfo::new(page_url);

    from_structured_data(&document, &page).or_else(|| from_html_patterns(&document, &page))
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css)
        .map_err(|e| tracing::error!(css, error = %e, "Invalid selector"))
        .ok()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

// ─── Strategy 1: JSON-LD ─────────────────────────────────────

fn from_structured_data(document: &Html, page: &PageInfo) -> Option<RecipeInput> {
    let scripts = selector(JSON_LD_SELECTOR)?;

    for script in document.select(&scripts) {
        let raw = script.text().collect::<String>();
        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed JSON-LD block");
                continue;
            }
        };

        if let Some(recipe) = find_recipe_object(&data) {
            return Some(normalize_recipe(recipe, page));
        }
    }

    None
}

/// First `Recipe` among the block's items or their `@graph` members.
fn find_recipe_object(data: &Value) -> Option<&Value> {
    let items: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut candidates = Vec::new();
    for item in items {
        if is_recipe(item) {
            candidates.push(item);
        }
        if let Some(Value::Array(graph)) = item.get("@graph") {
            candidates.extend(graph.iter().filter(|g| is_recipe(g)));
        }
    }

    candidates.into_iter().next()
}

fn is_recipe(item: &Value) -> bool {
    match item.get("@type") {
        Some(Value::String(t)) => t == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

fn normalize_recipe(recipe: &Value, page: &PageInfo) -> RecipeInput {
    let field = |key: &str| Some(scalar_text(recipe.get(key)));

    RecipeInput {
        id: None,
        title: scalar_text(recipe.get("name")),
        description: field("description"),
        ingredients: string_list(recipe.get("recipeIngredient")),
        instructions: instruction_list(recipe.get("recipeInstructions")),
        prep_time: field("prepTime"),
        cook_time: field("cookTime"),
        total_time: field("totalTime"),
        servings: field("recipeYield"),
        category: field("recipeCategory"),
        cuisine: field("recipeCuisine"),
        image: Some(nested_text(recipe.get("image"), "url")),
        author: Some(nested_text(recipe.get("author"), "name")),
        url: Some(page.url.clone()),
        source: Some(page.hostname.clone()),
        date_added: Some(page.extracted_at.clone()),
    }
}

/// Text of a scalar field. Numbers are rendered; arrays contribute their
/// first textual entry.
fn scalar_text(value: Option<&Value>) -> String {
    fn leaf(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    match value {
        Some(Value::Array(items)) => items.iter().find_map(leaf).unwrap_or_default(),
        Some(other) => leaf(other).unwrap_or_default(),
        None => String::new(),
    }
}

/// A string, or `key` of an object (`image.url`, `author.name`), or the
/// first entry of an array of either.
fn nested_text(value: Option<&Value>, key: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => obj
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(Value::Array(items)) => nested_text(items.first(), key),
        _ => String::new(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}

/// Instruction steps: strings, `HowToStep`-like objects with `text`, or
/// objects with only a `name`. Empty steps are dropped.
fn instruction_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .map(|step| match step {
                Value::String(s) => s.clone(),
                Value::Object(obj) => ["text", "name"]
                    .iter()
                    .filter_map(|k| obj.get(*k).and_then(Value::as_str))
                    .find(|s| !s.is_empty())
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

// ─── Strategy 2: HTML patterns ───────────────────────────────

fn from_html_patterns(document: &Html, page: &PageInfo) -> Option<RecipeInput> {
    let title = TITLE_SELECTORS
        .iter()
        .filter_map(|css| selector(css))
        .filter_map(|sel| document.select(&sel).next().map(element_text))
        .find(|text| !text.is_empty())?;

    let ingredients = first_matching_list(document, INGREDIENT_SELECTORS);
    if ingredients.is_empty() {
        return None;
    }
    let instructions = first_matching_list(document, INSTRUCTION_SELECTORS);

    Some(RecipeInput {
        id: None,
        title,
        description: Some(String::new()),
        ingredients,
        instructions,
        prep_time: Some(String::new()),
        cook_time: Some(String::new()),
        total_time: Some(String::new()),
        servings: Some(String::new()),
        category: Some(String::new()),
        cuisine: Some(String::new()),
        image: Some(String::new()),
        author: Some(String::new()),
        url: Some(page.url.clone()),
        source: Some(page.hostname.clone()),
        date_added: Some(page.extracted_at.clone()),
    })
}

/// Texts of every match of the first selector that matches anything.
/// Later selectors are not consulted, even if the winner's texts are empty.
fn first_matching_list(document: &Html, selectors: &[&str]) -> Vec<String> {
    for sel in selectors.iter().filter_map(|css| selector(css)) {
        let matches: Vec<ElementRef<'_>> = document.select(&sel).collect();
        if !matches.is_empty() {
            return matches
                .into_iter()
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect();
        }
    }
    Vec::new()
}
