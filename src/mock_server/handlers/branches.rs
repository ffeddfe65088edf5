//! Branch endpoint handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
};

use super::{authorize, not_found, ok, SharedState};

/// GET /repos/{owner}/{repo}/branches
pub async fn list_branches(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let full_name = format!("{owner}/{name}");
    if state.repos.get(&full_name).is_none() {
        return not_found("repository", &full_name);
    }

    let branches = state.branches_of(&full_name).cloned().unwrap_or_default();
    ok(branches.into())
}

/// GET /repos/{owner}/{repo}/branches/{branch}
pub async fn get_branch(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((owner, name, branch)): Path<(String, String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let found = state
        .branches_of(&format!("{owner}/{name}"))
        .and_then(|all| all.iter().find(|b| b["name"].as_str() == Some(branch.as_str())));

    match found {
        Some(b) => ok(b.clone()),
        None => not_found("branch", &branch),
    }
}
