//! User endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::{authorize, created, error, not_found, ok, search_results, SearchQuery, SharedState};

/// GET /user
pub async fn get_current_user(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.current_user() {
        Some(user) => ok(user.clone()),
        None => error(StatusCode::UNAUTHORIZED, "No authenticated user"),
    }
}

/// GET /users/{username}
pub async fn get_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_user(&username) {
        Some(user) => ok(user.clone()),
        None => not_found("user", &username),
    }
}

/// GET /users/search
pub async fn search_users(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    search_results(state.search_users(query.needle(), query.limit()))
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.create_user(&body) {
        Some(user) => created(user),
        None => error(StatusCode::UNPROCESSABLE_ENTITY, "user already exists"),
    }
}

/// DELETE /admin/users/{username}
pub async fn delete_user(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.users.remove(&username) {
        Some(_) => {
            state.passwords.remove(&username);
            state.tokens.remove(&username);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("user", &username),
    }
}
