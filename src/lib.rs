//! Gogs API client library.
//!
//! A Rust library for the Gogs self-hosted Git service REST API, built as a
//! small object model: entity types (users, organizations, repositories,
//! branches, tokens) share one lifecycle, and their collections share one
//! set of non-destructive chainable transforms.
//!
//! # Quick Start
//!
//! ```no_run
//! use gogsapi::{GogsClient, Resource, ResourceCollection, SearchParams, SortKey};
//!
//! #[tokio::main]
//! async fn main() -> gogsapi::Result<()> {
//!     // Create client from environment variables
//!     let client = GogsClient::from_env()?;
//!
//!     // The authenticated user
//!     let mut me = client.user("me");
//!     me.load(false).await?;
//!
//!     // Their repositories, newest first, two at a time
//!     let mut repos = me.repos();
//!     repos.load(false).await?;
//!     let newest = repos.sort_by(SortKey::Created, true).limit(2);
//!     println!("Newest: {} repos", newest.len());
//!
//!     // Server-side user search
//!     let found = client.users().search(&SearchParams::new("ali"), false).await?;
//!     println!("Found {} users", found.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around two traits:
//!
//! - [`Resource`] - A single entity: `load`, `create`, `patch`, `delete`, `matches`
//! - [`ResourceCollection`] - A keyed set of entities: `load`, `search`, `get`,
//!   `create`, `sort_by`, plus the [`Collection`] transforms
//!
//! Each entity type says which endpoint serves which [`Operation`]; every
//! request goes through one [`Transport`] and is recorded in the client's
//! [`RequestLog`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GOGS_API_TOKEN` (required) - Your Gogs access token
//! - `GOGS_API_URL` (optional) - API root (defaults to `http://localhost:3000/api/v1`)

mod client;
mod collection;
mod error;
mod log;
mod models;
mod params;
mod resolver;
mod resource;
mod status;
mod transport;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::GogsClient;
pub use collection::{Collection, Key};
pub use error::{GogsError, Result};
pub use log::{excerpt, LogEntry, LogPhase, RequestLog, RESPONSE_EXCERPT_LEN};
pub use params::{validate_clone_address, Arg, ParamType, Params};
pub use resolver::{FieldStore, Schema, StorageKey};
pub use status::{status_phrase, UNKNOWN_STATUS};
pub use transport::{AuthMode, RawResponse, Transport, Verb, MAX_REDIRECTS, REQUEST_TIMEOUT};

// Re-export the lifecycle traits
pub use resource::{
    decode, match_fields, CollectionCore, LoadState, Operation, Resource, ResourceCollection,
    ResourceCore, SearchParams, SearchQuery, SearchValue, SortKey, DEFAULT_SEARCH_LIMIT,
    ENTITY_VERSION,
};

// Re-export models
pub use models::{
    // Users and organizations
    Org,
    Orgs,
    User,
    Users,
    ORG,
    USER,
    // Repositories
    Repo,
    Repos,
    REPO,
    // Branches
    Branch,
    Branches,
    BRANCH,
    // Tokens
    Token,
    Tokens,
    TOKEN,
    // Associations
    OwnerKind,
    OwnerRef,
    RepoRef,
};
