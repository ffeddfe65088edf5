//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic Gogs payloads.

use serde_json::{json, Value};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Account Fixtures
    // =========================================================================

    /// A user account as `/users/{name}` returns it.
    pub fn user(id: i64, username: &str, full_name: &str) -> Value {
        json!({
            "id": id,
            "username": username,
            "login": username,
            "full_name": full_name,
            "email": format!("{username}@example.com"),
            "avatar_url": format!("https://secure.gravatar.com/avatar/{id}"),
        })
    }

    /// An organization as `/orgs/{name}` returns it.
    pub fn org(id: i64, name: &str, description: &str) -> Value {
        json!({
            "id": id,
            "username": name,
            "full_name": name.to_uppercase(),
            "avatar_url": format!("https://secure.gravatar.com/avatar/{id}"),
            "description": description,
            "website": format!("https://{name}.example.com"),
            "location": "",
        })
    }

    // =========================================================================
    // Repository Fixtures
    // =========================================================================

    /// A public repository with an embedded owner.
    pub fn repo(id: i64, owner: &Value, name: &str, created_at: &str) -> Value {
        let owner_name = owner["username"].as_str().unwrap_or_default();
        json!({
            "id": id,
            "owner": owner.clone(),
            "name": name,
            "full_name": format!("{owner_name}/{name}"),
            "description": format!("The {name} repository"),
            "private": false,
            "fork": false,
            "mirror": false,
            "html_url": format!("http://localhost:3000/{owner_name}/{name}"),
            "clone_url": format!("http://localhost:3000/{owner_name}/{name}.git"),
            "ssh_url": format!("git@localhost:{owner_name}/{name}.git"),
            "default_branch": "master",
            "stars_count": 0,
            "forks_count": 0,
            "watchers_count": 1,
            "open_issues_count": 0,
            "created_at": created_at,
            "updated_at": created_at,
        })
    }

    /// A private repository.
    pub fn private_repo(id: i64, owner: &Value, name: &str, created_at: &str) -> Value {
        let mut repo = Self::repo(id, owner, name, created_at);
        repo["private"] = Value::Bool(true);
        repo
    }

    /// A pull mirror of another repository.
    pub fn mirror_repo(id: i64, owner: &Value, name: &str, created_at: &str) -> Value {
        let mut repo = Self::repo(id, owner, name, created_at);
        repo["mirror"] = Value::Bool(true);
        repo
    }

    /// A branch whose head commit is `commit_id`.
    pub fn branch(name: &str, commit_id: &str, message: &str) -> Value {
        json!({
            "name": name,
            "commit": {
                "id": commit_id,
                "message": message,
                "url": "",
                "author": {"name": "Alice", "email": "alice@example.com", "username": "alice"},
                "timestamp": "2024-01-01T00:00:00Z",
            },
        })
    }

    /// Create a default test scenario with related entities.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub users: Vec<Value>,
    pub orgs: Vec<(Value, Vec<&'static str>)>,
    pub repos: Vec<Value>,
    pub branches: Vec<(String, Vec<Value>)>,
    pub passwords: Vec<(&'static str, &'static str)>,
    pub authenticated: &'static str,
}

impl DefaultScenario {
    fn new() -> Self {
        let alice = Fixtures::user(1, "alice", "Alice Liddell");
        let bob = Fixtures::user(2, "bob", "Bob Builder");
        let acme = Fixtures::org(3, "acme", "Acme Corporation");

        let repos = vec![
            Fixtures::repo(10, &alice, "demo", "2020-03-01T10:00:00Z"),
            Fixtures::private_repo(11, &alice, "notes", "2019-06-15T08:30:00Z"),
            Fixtures::repo(12, &acme, "site", "2021-01-10T12:00:00Z"),
            Fixtures::mirror_repo(13, &bob, "upstream", "2022-05-05T05:05:05Z"),
        ];

        let branches = vec![(
            "alice/demo".to_string(),
            vec![
                Fixtures::branch(
                    "master",
                    "7d3c6b2c1f4e0a9b8c7d6e5f4a3b2c1d0e9f8a7b",
                    "Initial commit\n",
                ),
                Fixtures::branch(
                    "develop",
                    "0a1b2c3d4e5f60718293a4b5c6d7e8f901234567",
                    "Add feature\n",
                ),
            ],
        )];

        Self {
            users: vec![alice, bob],
            orgs: vec![(acme, vec!["alice"])],
            repos,
            branches,
            passwords: vec![("alice", "alice-password")],
            authenticated: "alice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_fixture() {
        let user = Fixtures::user(7, "carol", "Carol");
        assert_eq!(user["id"], 7);
        assert_eq!(user["email"], "carol@example.com");
        assert_eq!(user["login"], "carol");
    }

    #[test]
    fn test_repo_embeds_owner() {
        let owner = Fixtures::user(1, "alice", "Alice");
        let repo = Fixtures::private_repo(5, &owner, "demo", "2020-01-01T00:00:00Z");
        assert_eq!(repo["full_name"], "alice/demo");
        assert_eq!(repo["owner"]["id"], 1);
        assert_eq!(repo["private"], true);
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert_eq!(scenario.users.len(), 2);
        assert_eq!(scenario.repos.len(), 4);
        assert_eq!(scenario.authenticated, "alice");
        assert_eq!(scenario.branches[0].1.len(), 2);
    }
}
