//! Mock Gogs API server.
//!
//! Provides an axum-based HTTP server that simulates the Gogs API under
//! `/api/v1`.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/api/v1";

/// A mock Gogs API server for testing.
///
/// The server runs in the background and can be used to test the Gogs client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `api_url()` to get the API root to hand to a client.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The API root, suitable for `GogsClient::new`.
    pub fn api_url(&self) -> String {
        format!("{}{}", self.url, API_PREFIX)
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    pub fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new().with_authenticated(scenario.authenticated);

        for user in scenario.users {
            state = state.with_user(user);
        }

        for (org, members) in scenario.orgs {
            state = state.with_org(org, &members);
        }

        for repo in scenario.repos {
            state = state.with_repo(repo);
        }

        for (full_name, branches) in scenario.branches {
            state = state.with_branches(&full_name, branches);
        }

        for (username, password) in scenario.passwords {
            state = state.with_password(username, password);
        }

        state
    }

    /// Create the axum router with all routes.
    pub fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api = Router::new()
            // User routes
            .route("/user", get(handlers::get_current_user))
            .route("/users/search", get(handlers::search_users))
            .route("/users/:username", get(handlers::get_user))
            .route("/admin/users", post(handlers::create_user))
            .route(
                "/admin/users/:username",
                axum::routing::delete(handlers::delete_user),
            )
            // Organization routes
            .route("/user/orgs", get(handlers::list_my_orgs))
            .route("/users/:username/orgs", get(handlers::list_user_orgs))
            .route("/orgs/:name", get(handlers::get_org))
            .route("/admin/users/:username/orgs", post(handlers::create_org))
            // Repository routes
            .route(
                "/user/repos",
                get(handlers::list_my_repos).post(handlers::create_my_repo),
            )
            .route("/users/:username/repos", get(handlers::list_user_repos))
            .route("/orgs/:name/repos", get(handlers::list_org_repos))
            .route("/org/:name/repos", post(handlers::create_org_repo))
            .route(
                "/admin/users/:username/repos",
                post(handlers::create_user_repo),
            )
            .route("/repos/search", get(handlers::search_repos))
            .route("/repos/migrate", post(handlers::migrate_repo))
            .route(
                "/repos/:owner/:repo",
                get(handlers::get_repo).delete(handlers::delete_repo),
            )
            .route(
                "/repos/:owner/:repo/mirror-sync",
                post(handlers::sync_mirror),
            )
            // Branch routes
            .route(
                "/repos/:owner/:repo/branches",
                get(handlers::list_branches),
            )
            .route(
                "/repos/:owner/:repo/branches/:branch",
                get(handlers::get_branch),
            )
            // Token routes
            .route(
                "/users/:username/tokens",
                get(handlers::list_tokens).post(handlers::create_token),
            );

        Router::new()
            .nest(API_PREFIX, api)
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GogsClient, Resource, ResourceCollection, SearchParams};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_router_requires_token_when_configured() {
        let state = MockServer::default_state()
            .with_required_token("secret")
            .shared();
        let app = MockServer::create_router(state);

        let missing = app
            .clone()
            .oneshot(Request::get("/api/v1/user").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let wrong = app
            .clone()
            .oneshot(
                Request::get("/api/v1/user")
                    .header("Authorization", "token nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::FORBIDDEN);

        let right = app
            .oneshot(
                Request::get("/api/v1/user")
                    .header("Authorization", "token secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(right.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_static_search_route_wins_over_username() {
        let app = MockServer::create_router(MockServer::default_state().shared());

        let response = app
            .oneshot(
                Request::get("/api/v1/users/search?q=ali&limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_load_user_with_gogs_client() {
        let server = MockServer::start().await;
        let client = GogsClient::new("test-token", &server.api_url()).unwrap();

        let mut me = client.user("me");
        me.load(false).await.expect("Failed to load user");

        assert_eq!(me.username(), Some("alice"));
        assert_eq!(me.id(), Some(1));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_search_users_with_gogs_client() {
        let server = MockServer::start().await;
        let client = GogsClient::new("test-token", &server.api_url()).unwrap();

        let found = client
            .users()
            .search(&SearchParams::new("bob"), false)
            .await
            .expect("Failed to search users");

        assert_eq!(found.len(), 1);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = GogsClient::new("test-token", &server.api_url()).unwrap();

        let mut user = client.user("nobody");
        let result = user.load(false).await;

        assert!(result.is_err());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let state = MockState::new().with_user(Fixtures::user(42, "carol", "Carol Custom"));

        let server = MockServer::with_state(state).await;
        let client = GogsClient::new("test-token", &server.api_url()).unwrap();

        let mut carol = client.user("carol");
        carol.load(false).await.expect("Failed to load user");

        assert_eq!(carol.full_name(), Some("Carol Custom"));

        server.shutdown().await;
    }
}
