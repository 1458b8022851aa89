// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use recipe_saver::config::{Config, GithubEndpoints};
use recipe_saver::db::Database;
use recipe_saver::models::{GithubProfile, User};
use recipe_saver::routes::create_router;
use recipe_saver::services::SessionClaims;
use recipe_saver::AppState;
use serde_json::{json, Value};
use std::sync::Arc;

/// Create a test app with an in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default()).await
}

#[allow(dead_code)]
pub async fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let db = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");
    let state = Arc::new(AppState::new(config, db));
    (create_router(state.clone()), state)
}

/// Test app whose GitHub calls go to `github_base_url`.
#[allow(dead_code)]
pub async fn create_test_app_with_github(github_base_url: &str) -> (Router, Arc<AppState>) {
    let config = Config {
        github: GithubEndpoints {
            oauth_url: github_base_url.to_string(),
            api_url: github_base_url.to_string(),
        },
        ..Config::test_default()
    };
    create_test_app_with_config(config).await
}

/// Serve `app` on an ephemeral local port and return its base URL.
#[allow(dead_code)]
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Store a user and return a valid session token for them.
#[allow(dead_code)]
pub async fn signed_in_user(state: &AppState) -> (User, String) {
    let user = state
        .db
        .upsert_user_from_profile(&GithubProfile {
            github_id: "583231".to_string(),
            username: "octocat".to_string(),
            email: Some("octocat@github.com".to_string()),
            avatar_url: None,
            name: Some("The Octocat".to_string()),
        })
        .await
        .unwrap();
    let claims = SessionClaims::issue(&user, chrono::Utc::now());
    let token = state.tokens.sign(&claims).unwrap();
    (user, token)
}

/// Build a `POST /graphql` request.
#[allow(dead_code)]
pub fn graphql_request(query: &str, variables: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(
            json!({ "query": query, "variables": variables }).to_string(),
        ))
        .unwrap()
}

/// Run one GraphQL request against the router and return the JSON body.
#[allow(dead_code)]
pub async fn execute_graphql(
    app: &Router,
    query: &str,
    variables: Value,
    token: Option<&str>,
) -> Value {
    use tower::ServiceExt;

    let response = app
        .clone()
        .oneshot(graphql_request(query, variables, token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ─── GitHub stub ─────────────────────────────────────────────

/// Canned responses for the local GitHub stand-in.
#[allow(dead_code)]
#[derive(Clone)]
pub struct GithubStub {
    /// Body of `POST /login/oauth/access_token`
    pub token_response: Value,
    /// Body of `GET /user`
    pub user: Value,
    /// Status and body of `GET /user/emails`
    pub emails: (StatusCode, Value),
}

#[allow(dead_code)]
impl GithubStub {
    /// A stub that signs in `octocat` (public email) with access token `gho_test`.
    pub fn octocat() -> Self {
        Self {
            token_response: json!({
                "access_token": "gho_test",
                "token_type": "bearer",
                "scope": "user:email"
            }),
            user: json!({
                "id": 583231,
                "login": "octocat",
                "email": "octocat@github.com",
                "avatar_url": "https://avatars.githubusercontent.com/u/583231",
                "name": "The Octocat"
            }),
            emails: (StatusCode::OK, json!([])),
        }
    }

    /// Serve the stub on an ephemeral port and return its base URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/login/oauth/access_token", post(stub_access_token))
            .route("/user", get(stub_user))
            .route("/user/emails", get(stub_emails))
            .with_state(Arc::new(self));
        serve(app).await
    }
}

/// GitHub rejects API calls without a bearer token or `User-Agent`.
fn check_api_headers(headers: &HeaderMap) -> Result<(), StatusCode> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == "Bearer gho_test");
    let has_agent = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h == "Recipe-Saver-App");

    match (authorized, has_agent) {
        (true, true) => Ok(()),
        (false, _) => Err(StatusCode::UNAUTHORIZED),
        (true, false) => Err(StatusCode::FORBIDDEN),
    }
}

async fn stub_access_token(
    State(stub): State<Arc<GithubStub>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    if body["client_id"] != "test_client_id" || body["client_secret"] != "test_secret" {
        return Json(json!({
            "error": "incorrect_client_credentials",
            "error_description": "The client_id and/or client_secret passed are incorrect."
        }));
    }
    Json(stub.token_response.clone())
}

async fn stub_user(
    State(stub): State<Arc<GithubStub>>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    check_api_headers(&headers)?;
    Ok(Json(stub.user.clone()))
}

async fn stub_emails(
    State(stub): State<Arc<GithubStub>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    check_api_headers(&headers)?;
    let (status, body) = stub.emails.clone();
    Ok((status, Json(body)))
}
