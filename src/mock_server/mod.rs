//! Mock Gogs API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Gogs API
//! for integration and end-to-end testing. Unlike wiremock which mocks at the
//! HTTP level per-test, this server maintains state across requests, enabling
//! realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use gogsapi::mock_server::MockServer;
//! use gogsapi::{GogsClient, Resource};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GogsClient::new("test-token", &server.api_url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let mut me = client.user("me");
//!     me.load(false).await.unwrap();
//!     assert_eq!(me.username(), Some("alice"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::{MockServer, API_PREFIX};
pub use state::MockState;
