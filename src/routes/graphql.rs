// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GraphQL endpoint.

use crate::graphql::AppSchema;
use crate::middleware::Viewer;
use crate::AppState;
use async_graphql::http::GraphiQLSource;
use async_graphql::{BatchRequest, BatchResponse};
use async_graphql_axum::{GraphQLBatchRequest, GraphQLResponse};
use axum::{
    response::Html,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

pub const GRAPHQL_PATH: &str = "/graphql";

/// `POST /graphql`, plus the GraphiQL playground on `GET` when enabled.
pub fn routes(playground: bool) -> Router<Arc<AppState>> {
    let route = if playground {
        get(graphiql).post(graphql_handler)
    } else {
        post(graphql_handler)
    };
    Router::new().route(GRAPHQL_PATH, route)
}

/// Execute a GraphQL request, or a batch of them, on behalf of the resolved
/// viewer.
async fn graphql_handler(
    Extension(schema): Extension<AppSchema>,
    Extension(viewer): Extension<Viewer>,
    request: GraphQLBatchRequest,
) -> GraphQLResponse {
    let request = request.into_inner();
    let operations: Vec<Option<&str>> = match &request {
        BatchRequest::Single(r) => vec![r.operation_name.as_deref()],
        BatchRequest::Batch(rs) => rs.iter().map(|r| r.operation_name.as_deref()).collect(),
    };
    tracing::debug!(
        operations = ?operations,
        authenticated = viewer.user().is_some(),
        "GraphQL request"
    );

    let response = schema.execute_batch(request.data(viewer)).await;

    let messages: Vec<&str> = match &response {
        BatchResponse::Single(r) => r.errors.iter().map(|e| e.message.as_str()).collect(),
        BatchResponse::Batch(rs) => rs
            .iter()
            .flat_map(|r| r.errors.iter().map(|e| e.message.as_str()))
            .collect(),
    };
    if !messages.is_empty() {
        tracing::info!(errors = ?messages, "GraphQL request returned errors");
    }

    response.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}
