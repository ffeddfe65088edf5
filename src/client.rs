//! Gogs API client.
//!
//! Entry point that owns configuration and the request log, and hands out
//! entity objects and collections bound to its transport.

use std::env;

use crate::error::{GogsError, Result};
use crate::log::RequestLog;
use crate::models::{Repo, Repos, User, Users};
use crate::transport::Transport;

const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

/// Gogs API client.
///
/// This struct is cheaply cloneable; clones share the connection pool and the
/// request log.
///
/// # Example
///
/// ```no_run
/// use gogsapi::{GogsClient, Resource};
///
/// # async fn example() -> gogsapi::Result<()> {
/// // Create from environment variables
/// let client = GogsClient::from_env()?;
///
/// // Or configure manually
/// let client = GogsClient::new("your-api-token", "https://git.example.com/api/v1")?;
///
/// let mut me = client.user("me");
/// me.load(false).await?;
/// println!("Hello, {}", me.username().unwrap_or("?"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GogsClient {
    transport: Transport,
}

impl std::fmt::Debug for GogsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GogsClient")
            .field("base_url", &self.transport.base_url())
            .finish_non_exhaustive()
    }
}

impl GogsClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GOGS_API_TOKEN` for authentication and optionally `GOGS_API_URL`
    /// for the base URL (defaults to `http://localhost:3000/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if `GOGS_API_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("GOGS_API_TOKEN").map_err(|_| {
            GogsError::ConfigMissing("GOGS_API_TOKEN environment variable not set".to_string())
        })?;

        let base_url = env::var("GOGS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - Gogs access token
    /// * `base_url` - API root, e.g. `https://git.example.com/api/v1`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(base_url, token, RequestLog::new())?,
        })
    }

    /// Use a caller-owned request log for every request made from now on.
    pub fn with_log(self, log: RequestLog) -> Self {
        Self {
            transport: self.transport.with_log(log),
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// The request log shared by everything derived from this client.
    pub fn log(&self) -> &RequestLog {
        self.transport.log()
    }

    /// User search and lookup.
    pub fn users(&self) -> Users {
        Users::new(&self.transport)
    }

    /// A user by name, not yet loaded. `""` or `"me"` is the authenticated
    /// user.
    pub fn user(&self, name: &str) -> User {
        User::new(&self.transport, name)
    }

    /// Repositories of the authenticated user.
    pub fn repos(&self) -> Repos {
        Repos::new(&self.transport, None)
    }

    /// A repository addressed as `owner/name`, not yet loaded.
    pub fn repo(&self, full_name: &str) -> Repo {
        Repo::from_full_name(&self.transport, full_name)
    }

    /// Probe whether the token may read `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`GogsError::NotAuthorized`] for a 400-403 answer.
    pub async fn authorized(&self, scope: &str) -> Result<bool> {
        self.transport.authorized(scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let client = GogsClient::new("secret-token", "https://git.example.com/api/v1").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("git.example.com"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_with_log_shares_entries() {
        let log = RequestLog::new();
        let client = GogsClient::new("t", "https://git.example.com/api/v1")
            .unwrap()
            .with_log(log.clone());
        assert!(client.log().is_empty());
        client.log().push(crate::log::LogEntry {
            timestamp: chrono::Utc::now(),
            verb: "GET".to_string(),
            url: "https://git.example.com/api/v1/user".to_string(),
            phase: crate::log::LogPhase::Response {
                status: 200,
                excerpt: ".".to_string(),
            },
        });
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_user_me_is_authenticated() {
        let client = GogsClient::new("t", "https://git.example.com/api/v1").unwrap();
        assert!(client.user("me").authenticated());
        assert!(!client.user("alice").authenticated());
    }
}
