// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod graphql;

use crate::config::CorsPolicy;
use crate::middleware::{resolve_viewer, security::add_security_headers};
use crate::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// CORS layer for the configured policy.
fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    match policy {
        CorsPolicy::Wildcard => cors.allow_origin(Any),
        CorsPolicy::Mirror { .. } => {
            let policy = policy.clone();
            cors.allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _request_parts: &axum::http::request::Parts| {
                    origin
                        .to_str()
                        .map(|o| policy.allows_origin(o))
                        .unwrap_or(false)
                },
            ))
            .allow_credentials(true)
        }
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let schema = crate::graphql::build_schema(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .merge(graphql::routes(state.config.playground_enabled()))
        .layer(Extension(schema))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_viewer))
        .layer(middleware::from_fn(add_security_headers))
        .layer(cors_layer(&state.config.cors))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
