//! Repository endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::{
    authorize, created, error, list, not_found, ok, search_results, SearchQuery, SharedState,
};
use crate::mock_server::state::MockState;

/// GET /user/repos
///
/// Own repositories plus those of the user's organizations.
pub async fn list_my_repos(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(me) = state.authenticated.as_deref() else {
        return error(StatusCode::UNAUTHORIZED, "No authenticated user");
    };

    let mut repos = state.repos_of(me);
    for org in state.orgs_of(me) {
        if let Some(name) = org["username"].as_str() {
            repos.extend(state.repos_of(name));
        }
    }
    list(repos)
}

/// GET /users/{username}/repos
pub async fn list_user_repos(
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
    list(state.repos_of(&username))
}

/// GET /orgs/{name}/repos
pub async fn list_org_repos(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    if state.get_org(&name).is_none() {
        return not_found("organization", &name);
    }
    list(state.repos_of(&name))
}

/// GET /repos/search
pub async fn search_repos(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    search_results(state.search_repos(
        query.needle(),
        query.uid.unwrap_or(0),
        query.limit(),
    ))
}

/// GET /repos/{owner}/{repo}
pub async fn get_repo(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_repo(&owner, &name) {
        Some(repo) => ok(repo.clone()),
        None => not_found("repository", &format!("{owner}/{name}")),
    }
}

/// DELETE /repos/{owner}/{repo}
pub async fn delete_repo(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let full_name = format!("{owner}/{name}");
    match state.repos.remove(&full_name) {
        Some(_) => {
            state.branches.remove(&full_name);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found("repository", &full_name),
    }
}

/// POST /user/repos
pub async fn create_my_repo(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(owner) = state.current_user().cloned() else {
        return error(StatusCode::UNAUTHORIZED, "No authenticated user");
    };
    insert_repo(&mut state, &owner, &body)
}

/// POST /org/{name}/repos
pub async fn create_org_repo(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(owner) = state.get_org(&name).cloned() else {
        return not_found("organization", &name);
    };
    insert_repo(&mut state, &owner, &body)
}

/// POST /admin/users/{username}/repos
pub async fn create_user_repo(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let Some(owner) = state.get_user(&username).cloned() else {
        return not_found("user", &username);
    };
    insert_repo(&mut state, &owner, &body)
}

/// POST /repos/migrate
///
/// Creates the repository under the account with id `uid`; nothing is
/// actually cloned.
pub async fn migrate_repo(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    if body["clone_addr"].as_str().unwrap_or_default().is_empty() {
        return error(StatusCode::UNPROCESSABLE_ENTITY, "clone_addr is required");
    }

    let uid = body["uid"].as_i64().unwrap_or(0);
    let Some(owner) = state
        .users
        .values()
        .chain(state.orgs.values())
        .find(|account| account["id"].as_i64() == Some(uid))
        .cloned()
    else {
        return not_found("account", &uid.to_string());
    };

    let mut fields = body.clone();
    fields["name"] = body["repo_name"].clone();
    insert_repo(&mut state, &owner, &fields)
}

/// POST /repos/{owner}/{repo}/mirror-sync
pub async fn sync_mirror(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((owner, name)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    match state.get_repo(&owner, &name) {
        Some(repo) if repo["mirror"].as_bool() == Some(true) => {
            StatusCode::ACCEPTED.into_response()
        }
        Some(_) => error(StatusCode::NOT_FOUND, "repository is not a mirror"),
        None => not_found("repository", &format!("{owner}/{name}")),
    }
}

fn insert_repo(state: &mut MockState, owner: &Value, fields: &Value) -> Response {
    match state.create_repo(owner, fields) {
        Some(repo) => created(repo),
        None => error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "repository name is missing or already taken",
        ),
    }
}
