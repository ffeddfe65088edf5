//! HTTP transport.
//!
//! Turns a scope (path relative to the API base) and parameters into exactly
//! one request, records it in the [`RequestLog`], and classifies the response
//! per verb into a payload, an authorization failure, or an unexpected
//! response.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect, Client, Method};
use url::Url;

use crate::error::{GogsError, Result};
use crate::log::{excerpt, LogEntry, LogPhase, RequestLog};
use crate::params::Params;

/// Request timeout applied to every call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of redirects followed automatically.
pub const MAX_REDIRECTS: usize = 4;

const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entity label used in the user agent when no entity type is attached.
const DEFAULT_ENTITY: &str = "Client";

/// How requests authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// `Authorization: token <secret>`.
    Token,
    /// HTTP basic auth with the secret as password.
    Basic { user: String },
}

/// HTTP verbs understood by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Patch => Method::PATCH,
            Verb::Delete => Method::DELETE,
        }
    }

    /// Write verbs carry their parameters as a JSON body.
    pub fn has_body(self) -> bool {
        !matches!(self, Verb::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unclassified response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Low-level Gogs transport.
///
/// Cheap to clone; clones share the connection pool and the request log.
#[derive(Clone)]
pub struct Transport {
    http: Client,
    base_url: Arc<str>,
    secret: String,
    auth: AuthMode,
    entity: &'static str,
    entity_version: &'static str,
    log: RequestLog,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Create a transport for `base_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, token: &str, log: RequestLog) -> Result<Self> {
        Url::parse(base_url)?;

        let http = Client::builder()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(GogsError::Http)?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            secret: token.to_string(),
            auth: AuthMode::Token,
            entity: DEFAULT_ENTITY,
            entity_version: CLIENT_VERSION,
            log,
        })
    }

    /// A copy labelled with the calling entity type for the user agent.
    pub fn for_entity(&self, entity: &'static str, version: &'static str) -> Self {
        Self {
            entity,
            entity_version: version,
            ..self.clone()
        }
    }

    /// A copy using HTTP basic auth as `user` with `secret` as password.
    pub fn basic(&self, user: &str, secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            auth: AuthMode::Basic {
                user: user.to_string(),
            },
            ..self.clone()
        }
    }

    /// A copy appending to a different log.
    pub fn with_log(&self, log: RequestLog) -> Self {
        Self {
            log,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_mode(&self) -> &AuthMode {
        &self.auth
    }

    pub fn log(&self) -> &RequestLog {
        &self.log
    }

    /// The `User-Agent` sent with every request.
    pub fn user_agent(&self) -> String {
        format!(
            "Gogs Rust API Client/{} ({}) reqwest Client\\{} {}",
            CLIENT_VERSION,
            std::env::consts::OS,
            self.entity,
            self.entity_version
        )
    }

    fn url(&self, scope: &str) -> String {
        format!("{}{}", self.base_url, scope)
    }

    /// Send one request and return the raw status and body.
    #[tracing::instrument(skip(self, params), fields(entity = self.entity))]
    pub async fn execute(&self, verb: Verb, scope: &str, params: &Params) -> Result<RawResponse> {
        let mut url = self.url(scope);
        let agent = self.user_agent();
        let json = params.to_json()?;

        self.log.push(LogEntry {
            timestamp: Utc::now(),
            verb: verb.to_string(),
            url: url.clone(),
            phase: LogPhase::Request {
                payload: json.clone().unwrap_or_else(|| "none".to_string()),
                user_agent: agent.clone(),
            },
        });

        if !verb.has_body() && !params.is_empty() {
            url.push('?');
            url.push_str(&params.to_query());
        }

        let mut request = self
            .http
            .request(verb.method(), &url)
            .header(USER_AGENT, agent);

        request = match &self.auth {
            AuthMode::Token => request.header(AUTHORIZATION, format!("token {}", self.secret)),
            AuthMode::Basic { user } => request.basic_auth(user, Some(&self.secret)),
        };

        if verb.has_body() {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(json.unwrap_or_default());
        }

        let response = request.send().await.map_err(GogsError::Http)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(GogsError::Http)?;

        self.log.push(LogEntry {
            timestamp: Utc::now(),
            verb: verb.to_string(),
            url,
            phase: LogPhase::Response {
                status,
                excerpt: excerpt(&body),
            },
        });

        Ok(RawResponse { status, body })
    }

    /// GET: 200 is success, 401/403 an authorization failure.
    pub async fn get(&self, scope: &str, params: &Params) -> Result<String> {
        let RawResponse { status, body } = self.execute(Verb::Get, scope, params).await?;
        match status {
            200 => Ok(body),
            401 | 403 => Err(GogsError::not_authorized(body, Some(status))),
            _ => Err(GogsError::unexpected(body, status)),
        }
    }

    /// POST: 200/201/202 is success, 400/401/403 an authorization failure.
    pub async fn post(&self, scope: &str, params: &Params) -> Result<String> {
        let RawResponse { status, body } = self.execute(Verb::Post, scope, params).await?;
        match status {
            200..=202 => Ok(body),
            400 | 401 | 403 => Err(GogsError::not_authorized(body, Some(status))),
            _ => Err(GogsError::unexpected(body, status)),
        }
    }

    /// PATCH: 200/201 is success, 400/401/403 an authorization failure.
    pub async fn patch(&self, scope: &str, params: &Params) -> Result<String> {
        let RawResponse { status, body } = self.execute(Verb::Patch, scope, params).await?;
        match status {
            200 | 201 => Ok(body),
            400 | 401 | 403 => Err(GogsError::not_authorized(body, Some(status))),
            _ => Err(GogsError::unexpected(body, status)),
        }
    }

    /// DELETE: 200/204 is success, 401/403 an authorization failure.
    pub async fn delete(&self, scope: &str) -> Result<bool> {
        let RawResponse { status, body } =
            self.execute(Verb::Delete, scope, &Params::new()).await?;
        match status {
            200 | 204 => Ok(true),
            401 | 403 => Err(GogsError::not_authorized(body, Some(status))),
            _ => Err(GogsError::unexpected(body, status)),
        }
    }

    /// Probe whether the credentials may read `scope`.
    ///
    /// Only 400-403 are treated as failures; the payload is discarded.
    pub async fn authorized(&self, scope: &str) -> Result<bool> {
        let RawResponse { status, .. } = self.execute(Verb::Get, scope, &Params::new()).await?;
        if (400..=403).contains(&status) {
            return Err(GogsError::not_authorized("Not authorized", Some(status)));
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Transport {
        Transport::new("https://git.example.com/api/v1/", "secret-token", RequestLog::new())
            .unwrap()
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", transport());
        assert!(debug.contains("Transport"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let t = transport();
        assert_eq!(t.base_url(), "https://git.example.com/api/v1");
        assert_eq!(t.url("/user"), "https://git.example.com/api/v1/user");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Transport::new("not a url", "t", RequestLog::new()).unwrap_err();
        assert!(matches!(err, GogsError::Url(_)));
    }

    #[test]
    fn test_user_agent_names_entity() {
        let agent = transport().for_entity("Repo", "0.1.4").user_agent();
        assert!(agent.starts_with("Gogs Rust API Client/"));
        assert!(agent.ends_with(" reqwest Client\\Repo 0.1.4"));
        assert!(!agent.contains("reqwest/"));
    }

    #[test]
    fn test_basic_mode_shares_log() {
        let t = transport();
        let basic = t.basic("alice@example.com", "pw");
        assert_eq!(
            basic.auth_mode(),
            &AuthMode::Basic {
                user: "alice@example.com".to_string()
            }
        );
        assert_eq!(t.auth_mode(), &AuthMode::Token);
        basic.log().push(LogEntry {
            timestamp: Utc::now(),
            verb: "GET".into(),
            url: "u".into(),
            phase: LogPhase::Response {
                status: 200,
                excerpt: ".".into(),
            },
        });
        assert_eq!(t.log().len(), 1);
    }
}
