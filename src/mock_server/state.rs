//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Gogs API server. Entities
//! are kept as raw JSON objects, the same shape the real server returns.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::RwLock;

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Users indexed by username.
    pub users: BTreeMap<String, Value>,

    /// Organizations indexed by name.
    pub orgs: BTreeMap<String, Value>,

    /// Organization names each user belongs to.
    pub memberships: BTreeMap<String, Vec<String>>,

    /// Repositories indexed by full name (e.g., "alice/demo").
    pub repos: BTreeMap<String, Value>,

    /// Branches indexed by repository full name.
    pub branches: HashMap<String, Vec<Value>>,

    /// Access tokens indexed by username.
    pub tokens: HashMap<String, Vec<Value>>,

    /// Account passwords, checked by the basic-auth token endpoints.
    pub passwords: HashMap<String, String>,

    /// Username answering `/user`.
    pub authenticated: Option<String>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: Value) -> Self {
        if let Some(name) = name_of(&user, "username") {
            self.users.insert(name, user);
        }
        self
    }

    /// Add an organization with `members`.
    pub fn with_org(mut self, org: Value, members: &[&str]) -> Self {
        if let Some(name) = name_of(&org, "username") {
            for member in members {
                self.memberships
                    .entry(member.to_string())
                    .or_default()
                    .push(name.clone());
            }
            self.orgs.insert(name, org);
        }
        self
    }

    /// Add a repository to the state.
    pub fn with_repo(mut self, repo: Value) -> Self {
        if let Some(full_name) = name_of(&repo, "full_name") {
            self.repos.insert(full_name, repo);
        }
        self
    }

    /// Set the branches of a repository.
    pub fn with_branches(mut self, full_name: &str, branches: Vec<Value>) -> Self {
        self.branches.insert(full_name.to_string(), branches);
        self
    }

    /// Set a user's password for basic-auth endpoints.
    pub fn with_password(mut self, username: &str, password: &str) -> Self {
        self.passwords
            .insert(username.to_string(), password.to_string());
        self
    }

    /// Set the user that `/user` answers for.
    pub fn with_authenticated(mut self, username: &str) -> Self {
        self.authenticated = Some(username.to_string());
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    pub fn get_user(&self, username: &str) -> Option<&Value> {
        self.users.get(username)
    }

    /// The user that `/user` answers for.
    pub fn current_user(&self) -> Option<&Value> {
        self.authenticated
            .as_deref()
            .and_then(|name| self.users.get(name))
    }

    pub fn get_org(&self, name: &str) -> Option<&Value> {
        self.orgs.get(name)
    }

    pub fn get_repo(&self, owner: &str, name: &str) -> Option<&Value> {
        self.repos.get(&format!("{owner}/{name}"))
    }

    /// Users whose username or full name contains `query`, case-insensitively.
    pub fn search_users(&self, query: &str, limit: usize) -> Vec<&Value> {
        let query = query.to_lowercase();
        self.users
            .values()
            .filter(|u| {
                ["username", "full_name"]
                    .iter()
                    .any(|field| text_of(u, field).to_lowercase().contains(&query))
            })
            .take(limit)
            .collect()
    }

    /// Repositories whose name contains `query`, restricted to owner `uid`
    /// unless it is 0.
    pub fn search_repos(&self, query: &str, uid: i64, limit: usize) -> Vec<&Value> {
        let query = query.to_lowercase();
        self.repos
            .values()
            .filter(|r| text_of(r, "name").to_lowercase().contains(&query))
            .filter(|r| uid == 0 || r["owner"]["id"].as_i64() == Some(uid))
            .take(limit)
            .collect()
    }

    /// Repositories owned by `owner`.
    pub fn repos_of(&self, owner: &str) -> Vec<&Value> {
        self.repos
            .values()
            .filter(|r| r["owner"]["username"].as_str() == Some(owner))
            .collect()
    }

    /// Organizations `username` belongs to.
    pub fn orgs_of(&self, username: &str) -> Vec<&Value> {
        self.memberships
            .get(username)
            .map(|names| names.iter().filter_map(|n| self.orgs.get(n)).collect())
            .unwrap_or_default()
    }

    pub fn branches_of(&self, full_name: &str) -> Option<&Vec<Value>> {
        self.branches.get(full_name)
    }

    pub fn tokens_of(&self, username: &str) -> Vec<Value> {
        self.tokens.get(username).cloned().unwrap_or_default()
    }

    /// Whether `password` opens the account owning `email` or `username`.
    pub fn check_password(&self, login: &str, password: &str) -> Option<String> {
        let username = self
            .users
            .values()
            .find(|u| text_of(u, "email") == login || text_of(u, "username") == login)
            .and_then(|u| name_of(u, "username"))?;

        match self.passwords.get(&username) {
            Some(expected) if expected == password => Some(username),
            _ => None,
        }
    }

    /// Next free numeric id across users, organizations and repositories.
    pub fn next_id(&self) -> i64 {
        self.users
            .values()
            .chain(self.orgs.values())
            .chain(self.repos.values())
            .filter_map(|v| v["id"].as_i64())
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Insert a repository owned by `owner` and return it.
    pub fn create_repo(&mut self, owner: &Value, fields: &Value) -> Option<Value> {
        let owner_name = name_of(owner, "username")?;
        let name = name_of(fields, "name")?;
        let full_name = format!("{owner_name}/{name}");
        if self.repos.contains_key(&full_name) {
            return None;
        }

        let repo = json!({
            "id": self.next_id(),
            "owner": owner.clone(),
            "name": name,
            "full_name": full_name,
            "description": fields["description"].as_str().unwrap_or_default(),
            "private": fields["private"].as_bool().unwrap_or(false),
            "fork": false,
            "mirror": fields["mirror"].as_bool().unwrap_or(false),
            "stars_count": 0,
            "default_branch": "master",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
        });
        self.repos.insert(full_name, repo.clone());
        Some(repo)
    }

    /// Insert a user and return it; `None` if the username is taken.
    pub fn create_user(&mut self, fields: &Value) -> Option<Value> {
        let username = name_of(fields, "username")?;
        if self.users.contains_key(&username) {
            return None;
        }

        let user = json!({
            "id": self.next_id(),
            "username": username,
            "login": username,
            "full_name": fields["full_name"].as_str().unwrap_or_default(),
            "email": fields["email"].as_str().unwrap_or_default(),
            "avatar_url": "",
        });
        if let Some(password) = fields["password"].as_str() {
            self.passwords.insert(username.clone(), password.to_string());
        }
        self.users.insert(username, user.clone());
        Some(user)
    }

    /// Insert an organization owned by `owner` and return it.
    pub fn create_org(&mut self, owner: &str, fields: &Value) -> Option<Value> {
        let name = name_of(fields, "username")?;
        if self.orgs.contains_key(&name) || !self.users.contains_key(owner) {
            return None;
        }

        let org = json!({
            "id": self.next_id(),
            "username": name,
            "full_name": fields["full_name"].as_str().unwrap_or_default(),
            "avatar_url": "",
            "description": fields["description"].as_str().unwrap_or_default(),
            "website": fields["website"].as_str().unwrap_or_default(),
            "location": fields["location"].as_str().unwrap_or_default(),
        });
        self.memberships
            .entry(owner.to_string())
            .or_default()
            .push(name.clone());
        self.orgs.insert(name, org.clone());
        Some(org)
    }

    /// Add a token for `username` and return it.
    pub fn create_token(&mut self, username: &str, name: &str) -> Value {
        let tokens = self.tokens.entry(username.to_string()).or_default();
        let token = json!({
            "name": name,
            "sha1": format!("{:040x}", tokens.len() + 1),
        });
        tokens.push(token.clone());
        token
    }
}

/// Owned copy of a string field.
fn name_of(value: &Value, field: &str) -> Option<String> {
    value[field].as_str().map(str::to_string)
}

fn text_of<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field].as_str().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Value {
        json!({"id": 1, "username": "alice", "full_name": "Alice Liddell", "email": "alice@example.com"})
    }

    #[test]
    fn test_state_add_and_get_user() {
        let state = MockState::new().with_user(alice());

        let user = state.get_user("alice");
        assert!(user.is_some());
        assert_eq!(user.unwrap()["full_name"], "Alice Liddell");
    }

    #[test]
    fn test_search_users_matches_full_name() {
        let state = MockState::new()
            .with_user(alice())
            .with_user(json!({"id": 2, "username": "bob", "full_name": "Bob"}));

        assert_eq!(state.search_users("LIDD", 10).len(), 1);
        assert_eq!(state.search_users("", 10).len(), 2);
        assert_eq!(state.search_users("", 1).len(), 1);
    }

    #[test]
    fn test_search_repos_by_owner_id() {
        let mut state = MockState::new().with_user(alice());
        let owner = alice();
        state.create_repo(&owner, &json!({"name": "demo"})).unwrap();
        state.create_repo(&json!({"id": 9, "username": "bob"}), &json!({"name": "demo-two"}));

        assert_eq!(state.search_repos("demo", 0, 10).len(), 2);
        assert_eq!(state.search_repos("demo", 1, 10).len(), 1);
    }

    #[test]
    fn test_check_password_by_email() {
        let state = MockState::new()
            .with_user(alice())
            .with_password("alice", "s3cret");

        assert_eq!(
            state.check_password("alice@example.com", "s3cret").as_deref(),
            Some("alice")
        );
        assert!(state.check_password("alice@example.com", "wrong").is_none());
    }

    #[test]
    fn test_next_id_and_duplicate_repo() {
        let mut state = MockState::new().with_user(alice());
        assert_eq!(state.next_id(), 2);

        let owner = alice();
        assert!(state.create_repo(&owner, &json!({"name": "demo"})).is_some());
        assert!(state.create_repo(&owner, &json!({"name": "demo"})).is_none());
        assert_eq!(state.repos_of("alice").len(), 1);
    }
}
