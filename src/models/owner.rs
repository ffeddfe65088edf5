//! Association-by-identity references between entities.
//!
//! A repository names its owner and a branch names its repository without
//! holding the owning object, so loading or dropping one never touches the
//! other.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GogsError, Result};
use crate::resource::Operation;

/// What kind of account owns a repository or organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    /// The account the credentials belong to.
    AuthenticatedUser,
    User,
    Org,
}

/// Identity of an owning user or organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub username: Option<String>,
    pub id: Option<i64>,
}

impl OwnerRef {
    pub fn authenticated() -> Self {
        Self {
            kind: OwnerKind::AuthenticatedUser,
            username: None,
            id: None,
        }
    }

    pub fn user(username: &str) -> Self {
        Self {
            kind: OwnerKind::User,
            username: Some(username.to_string()),
            id: None,
        }
    }

    pub fn org(username: &str) -> Self {
        Self {
            kind: OwnerKind::Org,
            username: Some(username.to_string()),
            id: None,
        }
    }

    /// Read the `owner` object embedded in a repository payload.
    pub fn from_payload(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let username = object
            .get("username")
            .or_else(|| object.get("login"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let id = object.get("id").and_then(Value::as_i64);
        if username.is_none() && id.is_none() {
            return None;
        }
        Some(Self {
            kind: OwnerKind::User,
            username,
            id,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.kind == OwnerKind::AuthenticatedUser
    }

    pub fn is_org(&self) -> bool {
        self.kind == OwnerKind::Org
    }

    /// Fill identity gaps from a payload without changing the kind.
    pub fn merge(&mut self, other: &OwnerRef) {
        if self.username.is_none() {
            self.username.clone_from(&other.username);
        }
        if self.id.is_none() {
            self.id = other.id;
        }
    }

    /// The username, required by `op`.
    ///
    /// # Errors
    ///
    /// Returns [`GogsError::InvalidMethodRequest`] when the username is unknown.
    pub fn require_username(&self, op: Operation) -> Result<&str> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                GogsError::InvalidMethodRequest(format!("::{op}:: missing owner 'username'"))
            })
    }

    /// Path under which the owner's `kind` collection lives, e.g.
    /// `/user/repos`, `/users/alice/orgs` or `/orgs/acme/repos`.
    pub fn collection_scope(&self, kind: &str, op: Operation) -> Result<String> {
        Ok(match self.kind {
            OwnerKind::AuthenticatedUser => format!("/user/{kind}"),
            OwnerKind::User => format!("/users/{}/{kind}", self.require_username(op)?),
            OwnerKind::Org => format!("/orgs/{}/{kind}", self.require_username(op)?),
        })
    }
}

/// Identity of a repository, as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Parse `owner/name`.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(owner, name))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}
