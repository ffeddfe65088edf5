//! Organization endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde_json::Value;

use super::{authorize, created, error, list, not_found, ok, SharedState};

/// GET /user/orgs
pub async fn list_my_orgs(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.authenticated.as_deref() {
        Some(me) => list(state.orgs_of(me)),
        None => error(StatusCode::UNAUTHORIZED, "No authenticated user"),
    }
}

/// GET /users/{username}/orgs
pub async fn list_user_orgs(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    if state.get_user(&username).is_none() {
        return not_found("user", &username);
    }
    list(state.orgs_of(&username))
}

/// GET /orgs/{name}
pub async fn get_org(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_org(&name) {
        Some(org) => ok(org.clone()),
        None => not_found("organization", &name),
    }
}

/// POST /admin/users/{username}/orgs
pub async fn create_org(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    if state.get_user(&username).is_none() {
        return not_found("user", &username);
    }
    match state.create_org(&username, &body) {
        Some(org) => created(org),
        None => error(StatusCode::UNPROCESSABLE_ENTITY, "organization already exists"),
    }
}
