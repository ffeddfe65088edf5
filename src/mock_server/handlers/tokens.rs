//! Access token endpoint handlers.
//!
//! These endpoints authenticate with basic auth as the token owner, not
//! with a token.

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value;

use super::{created, error, ok, SharedState};
use crate::mock_server::state::MockState;

/// Login and password from an `Authorization: Basic ...` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (login, password) = decoded.split_once(':')?;
    Some((login.to_string(), password.to_string()))
}

/// The credentials must open the account named in the path.
fn authorize_owner(state: &MockState, headers: &HeaderMap, username: &str) -> Result<(), Response> {
    let Some((login, password)) = basic_credentials(headers) else {
        return Err(error(StatusCode::UNAUTHORIZED, "Basic authentication required"));
    };

    match state.check_password(&login, &password) {
        Some(owner) if owner == username => Ok(()),
        _ => Err(error(StatusCode::FORBIDDEN, "Invalid credentials")),
    }
}

/// GET /users/{username}/tokens
pub async fn list_tokens(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize_owner(&state, &headers, &username) {
        return denied;
    }

    ok(state.tokens_of(&username).into())
}

/// POST /users/{username}/tokens
pub async fn create_token(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize_owner(&state, &headers, &username) {
        return denied;
    }

    match body["name"].as_str().filter(|n| !n.is_empty()) {
        Some(name) => created(state.create_token(&username, name)),
        None => error(StatusCode::UNPROCESSABLE_ENTITY, "name is required"),
    }
}
