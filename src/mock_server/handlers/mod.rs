//! HTTP request handlers for the mock server.

pub mod branches;
pub mod orgs;
pub mod repos;
pub mod tokens;
pub mod users;

pub use branches::*;
pub use orgs::*;
pub use repos::*;
pub use tokens::*;
pub use users::*;

use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::DEFAULT_SEARCH_LIMIT;

pub type SharedState = Arc<RwLock<MockState>>;

/// Query parameters of the search endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub uid: Option<i64>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    fn needle(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

/// Check the `Authorization: token ...` header against the required token.
pub(crate) fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(expected) = state.required_token.as_deref() else {
        return Ok(());
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("token "));

    match presented {
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(error(StatusCode::FORBIDDEN, "Token is invalid")),
        None => Err(error(StatusCode::UNAUTHORIZED, "Token is required")),
    }
}

/// `{"message": ...}` error body with `status`.
pub(crate) fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

pub(crate) fn not_found(what: &str, name: &str) -> Response {
    error(StatusCode::NOT_FOUND, &format!("{what} '{name}' does not exist"))
}

pub(crate) fn ok(value: Value) -> Response {
    (StatusCode::OK, Json(value)).into_response()
}

pub(crate) fn created(value: Value) -> Response {
    (StatusCode::CREATED, Json(value)).into_response()
}

/// Owned JSON array of `items`.
pub(crate) fn list(items: Vec<&Value>) -> Response {
    ok(Value::Array(items.into_iter().cloned().collect()))
}

/// Search results in the `{"data": [...], "ok": true}` envelope.
pub(crate) fn search_results(items: Vec<&Value>) -> Response {
    let data: Vec<Value> = items.into_iter().cloned().collect();
    ok(json!({ "data": data, "ok": true }))
}
