// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GraphQL API tests.
//!
//! These tests verify that:
//! 1. Listing and stats require a session while single reads do not
//! 2. Mutations report failures in their payloads
//! 3. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use recipe_saver::config::{Config, CorsPolicy, Environment};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

use common::{create_test_app, create_test_app_with_config, execute_graphql, signed_in_user};

const CREATE: &str = "mutation Create($input: RecipeInput!) {
  createRecipe(input: $input) { success id error recipe { id title ingredients userId user { username } } }
}";

fn soup_input() -> Value {
    json!({
        "title": "Chicken Soup",
        "ingredients": ["1 lb chicken", "2 carrots"],
        "instructions": ["Simmer."],
        "url": "https://kitchen.example.com/soup"
    })
}

fn error_code(body: &Value) -> Option<&str> {
    body["errors"][0]["extensions"]["code"].as_str()
}

#[tokio::test]
async fn test_health_query() {
    let (app, _) = create_test_app().await;
    let body = execute_graphql(&app, "{ health }", json!({}), None).await;
    assert_eq!(
        body["data"]["health"],
        "Recipe Saver GraphQL API is running"
    );
}

#[tokio::test]
async fn test_listing_requires_auth_but_single_read_does_not() {
    let (app, _) = create_test_app().await;

    let created = execute_graphql(&app, CREATE, json!({ "input": soup_input() }), None).await;
    let id = created["data"]["createRecipe"]["id"].as_str().unwrap().to_string();

    let listing = execute_graphql(&app, "{ recipes { id } }", json!({}), None).await;
    assert_eq!(listing["errors"][0]["message"], "Authentication required");
    assert_eq!(error_code(&listing), Some("UNAUTHENTICATED"));
    assert!(listing["data"].is_null());

    let single = execute_graphql(
        &app,
        "query One($id: ID!) { recipe(id: $id) { id title ingredients } }",
        json!({ "id": id }),
        None,
    )
    .await;
    assert!(single.get("errors").is_none(), "{}", single);
    assert_eq!(single["data"]["recipe"]["title"], "Chicken Soup");
    assert_eq!(
        single["data"]["recipe"]["ingredients"],
        json!(["1 lb chicken", "2 carrots"])
    );

    let stats = execute_graphql(&app, "{ stats { totalRecipes } }", json!({}), None).await;
    assert_eq!(error_code(&stats), Some("UNAUTHENTICATED"));
}

#[tokio::test]
async fn test_authenticated_listing_and_stats() {
    let (app, state) = create_test_app().await;
    let (_, token) = signed_in_user(&state).await;

    execute_graphql(&app, CREATE, json!({ "input": soup_input() }), None).await;

    let listing = execute_graphql(&app, "{ recipes { title } }", json!({}), Some(&token)).await;
    assert_eq!(listing["data"]["recipes"], json!([{ "title": "Chicken Soup" }]));

    let stats = execute_graphql(
        &app,
        "{ stats { totalRecipes categories cuisines } }",
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(
        stats["data"]["stats"],
        json!({ "totalRecipes": 1, "categories": [], "cuisines": [] })
    );
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
    let (app, state) = create_test_app().await;
    let (_, token) = signed_in_user(&state).await;
    let tampered = format!("{}x", token);

    let listing = execute_graphql(&app, "{ recipes { id } }", json!({}), Some(&tampered)).await;
    assert_eq!(error_code(&listing), Some("UNAUTHENTICATED"));

    // Anonymous operations still work with a bad token
    let created = execute_graphql(
        &app,
        CREATE,
        json!({ "input": soup_input() }),
        Some(&tampered),
    )
    .await;
    assert_eq!(created["data"]["createRecipe"]["success"], true);
    assert!(created["data"]["createRecipe"]["recipe"]["userId"].is_null());
}

#[tokio::test]
async fn test_lowercase_bearer_and_raw_token() {
    let (app, state) = create_test_app().await;
    let (_, token) = signed_in_user(&state).await;

    for value in [format!("bearer {}", token), token.clone()] {
        let request = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, value)
            .body(Body::from(json!({ "query": "{ me { username } }" }).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["me"]["username"], "octocat");
    }
}

#[tokio::test]
async fn test_me() {
    let (app, state) = create_test_app().await;
    let (user, token) = signed_in_user(&state).await;

    let body = execute_graphql(
        &app,
        "{ me { id githubId username email avatarUrl name } }",
        json!({}),
        Some(&token),
    )
    .await;
    assert_eq!(
        body["data"]["me"],
        json!({
            "id": user.id,
            "githubId": "583231",
            "username": "octocat",
            "email": "octocat@github.com",
            "avatarUrl": null,
            "name": "The Octocat"
        })
    );

    let anonymous = execute_graphql(&app, "{ me { id } }", json!({}), None).await;
    assert_eq!(error_code(&anonymous), Some("UNAUTHENTICATED"));
}

#[tokio::test]
async fn test_create_records_owner_when_signed_in() {
    let (app, state) = create_test_app().await;
    let (user, token) = signed_in_user(&state).await;

    let body = execute_graphql(&app, CREATE, json!({ "input": soup_input() }), Some(&token)).await;
    let payload = &body["data"]["createRecipe"];
    assert_eq!(payload["success"], true);
    assert_eq!(payload["recipe"]["userId"], json!(user.id));
    assert_eq!(payload["recipe"]["user"]["username"], "octocat");
    assert_eq!(payload["id"], payload["recipe"]["id"]);

    let anonymous = execute_graphql(&app, CREATE, json!({ "input": soup_input() }), None).await;
    assert!(anonymous["data"]["createRecipe"]["recipe"]["user"].is_null());
}

#[tokio::test]
async fn test_update_missing_recipe_reports_not_found() {
    let (app, state) = create_test_app().await;
    execute_graphql(&app, CREATE, json!({ "input": soup_input() }), None).await;

    let body = execute_graphql(
        &app,
        "mutation { updateRecipe(id: \"missing\", input: { title: \"X\" }) { success error recipe { id } } }",
        json!({}),
        None,
    )
    .await;

    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(
        body["data"]["updateRecipe"],
        json!({ "success": false, "error": "Recipe not found", "recipe": null })
    );
    let stored = state.db.list_recipes().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Chicken Soup");
}

#[tokio::test]
async fn test_update_and_delete() {
    let (app, _) = create_test_app().await;
    let created = execute_graphql(&app, CREATE, json!({ "input": soup_input() }), None).await;
    let id = created["data"]["createRecipe"]["id"].clone();

    let updated = execute_graphql(
        &app,
        "mutation Update($id: ID!, $input: RecipeUpdateInput!) {
           updateRecipe(id: $id, input: $input) { success recipe { title ingredients } }
         }",
        json!({ "id": id, "input": { "title": "Soup 2", "ingredients": ["water"] } }),
        None,
    )
    .await;
    assert_eq!(
        updated["data"]["updateRecipe"],
        json!({ "success": true, "recipe": { "title": "Soup 2", "ingredients": ["water"] } })
    );

    let delete = "mutation Delete($id: ID!) { deleteRecipe(id: $id) { success error } }";
    let deleted = execute_graphql(&app, delete, json!({ "id": id }), None).await;
    assert_eq!(
        deleted["data"]["deleteRecipe"],
        json!({ "success": true, "error": null })
    );

    let again = execute_graphql(&app, delete, json!({ "id": id }), None).await;
    assert_eq!(
        again["data"]["deleteRecipe"],
        json!({ "success": false, "error": "Recipe not found" })
    );
}

#[tokio::test]
async fn test_import_and_search() {
    let (app, _) = create_test_app().await;
    execute_graphql(&app, CREATE, json!({ "input": soup_input() }), None).await;

    let imported = execute_graphql(
        &app,
        "mutation Import($recipes: [RecipeInput!]!) { importRecipes(recipes: $recipes) { success imported error } }",
        json!({ "recipes": [
            soup_input(),
            { "title": "Chicken Curry", "ingredients": ["chicken"], "instructions": [] },
            { "title": "Plain Rice", "ingredients": ["rice"], "instructions": [] }
        ] }),
        None,
    )
    .await;
    assert_eq!(
        imported["data"]["importRecipes"],
        json!({ "success": true, "imported": 2, "error": null })
    );

    let found = execute_graphql(
        &app,
        "query Search($q: String!) { searchRecipes(query: $q) { title } }",
        json!({ "q": "CHICKEN" }),
        None,
    )
    .await;
    let mut titles: Vec<&str> = found["data"]["searchRecipes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Chicken Curry", "Chicken Soup"]);
}

#[tokio::test]
async fn test_authenticate_github_failure_is_reported() {
    // Nothing listens on this port, so the exchange fails upstream.
    let (app, _) = common::create_test_app_with_github("http://127.0.0.1:9").await;

    let body = execute_graphql(
        &app,
        "mutation { authenticateGitHub(code: \"abc\") { success token user { id } error } }",
        json!({}),
        None,
    )
    .await;

    let payload = &body["data"]["authenticateGitHub"];
    assert_eq!(payload["success"], false);
    assert!(payload["token"].is_null());
    assert!(payload["error"]
        .as_str()
        .unwrap()
        .starts_with("GitHub API error"));
}

// ─── HTTP surface ────────────────────────────────────────────

#[tokio::test]
async fn test_health_route() {
    let (app, _) = create_test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_batched_requests_share_the_viewer() {
    let (app, state) = create_test_app().await;
    let (user, token) = signed_in_user(&state).await;

    let batch = json!([
        { "query": "{ health }" },
        { "query": "query Me { me { username } }", "operationName": "Me" }
    ]);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer\t{}", token))
                .body(Body::from(batch.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0]["data"]["health"], "Recipe Saver GraphQL API is running");
    assert_eq!(body[1]["data"]["me"]["username"], user.username);
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/graphql")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,authorization")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_cors_preflight_extension_origin() {
    let (app, _) = create_test_app().await;
    let origin = "chrome-extension://abcdefghijklmnopabcdefghijklmnop";

    let response = app.oneshot(preflight(origin)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        origin
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
}

#[tokio::test]
async fn test_cors_unlisted_origin_not_echoed() {
    let (app, _) = create_test_app().await;
    let response = app.oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard_policy() {
    let config = Config {
        cors: CorsPolicy::Wildcard,
        ..Config::test_default()
    };
    let (app, _) = create_test_app_with_config(config).await;

    let response = app.oneshot(preflight("https://anywhere.example")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
}

#[tokio::test]
async fn test_playground_only_outside_production() {
    let get_playground = || {
        Request::builder()
            .uri("/graphql")
            .body(Body::empty())
            .unwrap()
    };

    let (dev, _) = create_test_app().await;
    let response = dev.oneshot(get_playground()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let config = Config {
        environment: Environment::Production,
        ..Config::test_default()
    };
    let (prod, _) = create_test_app_with_config(config).await;
    let response = prod.oneshot(get_playground()).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
