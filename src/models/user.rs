//! User model and the user search collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::Key;
use crate::error::{GogsError, Result};
use crate::models::{Org, Orgs, OwnerKind, OwnerRef, Repo, Repos, Tokens};
use crate::params::{Arg, ParamType, Params};
use crate::resolver::Schema;
use crate::resource::{
    expected_object, CollectionCore, Operation, Resource, ResourceCollection, ResourceCore,
    SearchParams,
};
use crate::transport::Transport;

/// Fields of a Gogs user account.
pub static USER: Schema = Schema::new(
    "user",
    &["id", "login", "full_name", "email", "avatar_url", "username"],
    None,
);

/// A Gogs user.
///
/// Supported endpoints:
///
/// * GET `/user` (the authenticated user) and `/users/{name}`
/// * POST `/admin/users` (admin rights)
/// * DELETE `/admin/users/{name}` (admin rights)
#[derive(Debug, Clone)]
pub struct User {
    core: ResourceCore,
    authenticated: bool,
}

impl User {
    /// A user by name. An empty name or `"me"` is the authenticated user.
    pub fn new(transport: &Transport, name: &str) -> Self {
        let authenticated = name.is_empty() || name == "me";
        let mut core = ResourceCore::new(transport, Self::ENTITY, &USER);
        if !authenticated {
            core.fields_mut().assign("username", name);
        }
        Self {
            core,
            authenticated,
        }
    }

    /// A user with no identity yet, to be created remotely.
    pub fn unnamed(transport: &Transport) -> Self {
        Self {
            core: ResourceCore::new(transport, Self::ENTITY, &USER),
            authenticated: false,
        }
    }

    /// Whether this is the account the credentials belong to.
    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn id(&self) -> Option<i64> {
        self.core.fields().i64("id")
    }

    pub fn username(&self) -> Option<&str> {
        self.core.fields().str("username")
    }

    pub fn login(&self) -> Option<&str> {
        self.core.fields().str("login")
    }

    pub fn full_name(&self) -> Option<&str> {
        self.core.fields().str("full_name")
    }

    pub fn email(&self) -> Option<&str> {
        self.core.fields().str("email")
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.core.fields().str("avatar_url")
    }

    /// Reference used by repositories and organizations owned by this user.
    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef {
            kind: if self.authenticated {
                OwnerKind::AuthenticatedUser
            } else {
                OwnerKind::User
            },
            username: self.username().map(str::to_string),
            id: self.id(),
        }
    }

    /// Load the user when its username is not known yet.
    async fn ensure_identity(&mut self) -> Result<()> {
        if self.username().is_none() {
            self.load(false).await?;
        }
        Ok(())
    }

    /// Every repository visible under this user.
    pub fn repos(&self) -> Repos {
        Repos::new(self.core.transport(), Some(self.owner_ref()))
    }

    /// A single repository of this user, loaded.
    pub async fn repo(&mut self, name: &str) -> Result<Repo> {
        self.ensure_identity().await?;
        let mut repo = Repo::new(self.core.transport(), Some(self.owner_ref()), name);
        repo.load(false).await?;
        Ok(repo)
    }

    /// Organizations this user belongs to.
    pub fn organizations(&self) -> Orgs {
        Orgs::new(self.core.transport(), self.owner_ref())
    }

    pub fn orgs(&self) -> Orgs {
        self.organizations()
    }

    /// A single organization, loaded.
    pub async fn organization(&self, name: &str) -> Result<Org> {
        let mut org = Org::new(self.core.transport(), Some(self.owner_ref()), name);
        org.load(false).await?;
        Ok(org)
    }

    pub async fn org(&self, name: &str) -> Result<Org> {
        self.organization(name).await
    }

    /// Access tokens of this user.
    ///
    /// Tokens are managed with basic auth as the user's email and personal
    /// password, so the user is loaded first when its email is unknown.
    pub async fn tokens(&mut self, password: &str) -> Result<Tokens> {
        if self.email().is_none() || self.username().is_none() {
            self.load(false).await?;
        }
        let username = self.owner_ref().require_username(Operation::Load)?.to_string();
        let email = self
            .email()
            .ok_or_else(|| {
                GogsError::InvalidMethodRequest("::tokens:: missing user 'email'".to_string())
            })?
            .to_string();
        Ok(Tokens::new(self.core.transport(), &username, &email, password))
    }
}

#[async_trait]
impl Resource for User {
    const ENTITY: &'static str = "User";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Create => Some("/admin/users".to_string()),
            Operation::Delete => Some(format!(
                "/admin/users/{}",
                self.owner_ref().require_username(op)?
            )),
            Operation::Get | Operation::Load if self.authenticated => Some("/user".to_string()),
            Operation::Get | Operation::Load => {
                Some(format!("/users/{}", self.owner_ref().require_username(op)?))
            }
            _ => None,
        })
    }

    /// Positional order: username, email, source_id, login_name, password,
    /// send_notify.
    fn create_params(&self, args: &[Arg]) -> Result<Params> {
        let mut params = Params::new();
        params
            .set_param("username", args, 0, ParamType::Str, Value::Null)
            .set_param("email", args, 1, ParamType::Str, Value::Null)
            .set_param("source_id", args, 2, ParamType::Int, Value::Null)
            .set_param("login_name", args, 3, ParamType::Str, Value::Null)
            .set_param("password", args, 4, ParamType::Str, Value::Null)
            .set_param("send_notify", args, 5, ParamType::Bool, Value::Null);
        Ok(params)
    }
}

/// Users found through `/users/search`.
#[derive(Debug, Clone)]
pub struct Users {
    core: CollectionCore<User>,
}

impl Users {
    pub fn new(transport: &Transport) -> Self {
        Self {
            core: CollectionCore::new(transport, Self::ENTITY),
        }
    }
}

#[async_trait]
impl ResourceCollection for Users {
    type Item = User;

    const ENTITY: &'static str = "Users";

    fn core(&self) -> &CollectionCore<User> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CollectionCore<User> {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Search => Some("/users/search".to_string()),
            _ => None,
        })
    }

    fn hydrate(&self, object: Value) -> Result<(Option<Key>, User)> {
        let username = object
            .get("username")
            .and_then(Value::as_str)
            .ok_or_else(|| expected_object("User"))?
            .to_string();
        let mut user = User::new(self.core.transport(), &username);
        user.populate(object)?;
        Ok((Some(Key::Name(username)), user))
    }

    fn empty_like(&self) -> Self {
        Self::new(self.core.transport())
    }

    async fn search(&mut self, params: &SearchParams, strict: bool) -> Result<Self> {
        if self.is_loaded() {
            return self.search_loaded(params, &["username", "full_name"], strict);
        }

        let mut query = params.extra.clone();
        query
            .insert("q", params.require_query()?)
            .insert("limit", params.limit_or_default() as u64);
        self.search_remote(&query).await
    }

    async fn get(&mut self, id: &str) -> Result<Arc<User>> {
        if let Some(user) = self.by_key(&Key::from(id)) {
            return Ok(user);
        }

        let mut user = User::new(self.core.transport(), id);
        user.load(false).await?;
        let key = user.username().unwrap_or(id).to_string();
        let user = Arc::new(user);
        self.add_shared(Arc::clone(&user), Some(Key::Name(key)));
        Ok(user)
    }

    async fn create(&mut self, args: &[Arg]) -> Result<User> {
        let mut user = User::unnamed(self.core.transport());
        if !args.is_empty() {
            user.create(args).await?;
            let key = user.username().map(Key::from);
            self.add(user.clone(), key);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::RequestLog;
    use serde_json::json;

    fn transport() -> Transport {
        Transport::new("http://127.0.0.1:9/api/v1", "t", RequestLog::new()).unwrap()
    }

    #[test]
    fn test_me_is_authenticated() {
        let t = transport();
        assert!(User::new(&t, "").authenticated());
        assert!(User::new(&t, "me").authenticated());
        assert!(!User::new(&t, "alice").authenticated());
    }

    #[test]
    fn test_scopes() {
        let t = transport();
        let me = User::new(&t, "me");
        assert_eq!(me.scope(Operation::Load).unwrap().as_deref(), Some("/user"));

        let alice = User::new(&t, "alice");
        assert_eq!(
            alice.scope(Operation::Load).unwrap().as_deref(),
            Some("/users/alice")
        );
        assert_eq!(
            alice.scope(Operation::Delete).unwrap().as_deref(),
            Some("/admin/users/alice")
        );
        assert_eq!(alice.scope(Operation::Patch).unwrap(), None);
    }

    #[test]
    fn test_delete_without_username_is_invalid() {
        let user = User::unnamed(&transport());
        assert!(matches!(
            user.scope(Operation::Delete).unwrap_err(),
            GogsError::InvalidMethodRequest(_)
        ));
    }

    #[test]
    fn test_create_params_order() {
        let user = User::unnamed(&transport());
        let mut params = user
            .create_params(&crate::args!["bob", "bob@example.com", 0, "bob", "pw"])
            .unwrap();
        params.filter_params();
        assert_eq!(params.get("source_id"), Some(&json!(0)));
        assert_eq!(params.get("password"), Some(&json!("pw")));
        assert!(!params.contains("send_notify"));
    }

    #[test]
    fn test_owner_ref_after_populate() {
        let mut me = User::new(&transport(), "");
        me.populate(json!({"id": 1, "username": "alice", "email": "a@x.io"}))
            .unwrap();
        let owner = me.owner_ref();
        assert!(owner.is_authenticated());
        assert_eq!(owner.username.as_deref(), Some("alice"));
        assert_eq!(owner.id, Some(1));
    }

    #[test]
    fn test_hydrate_keys_by_username() {
        let users = Users::new(&transport());
        let (key, user) = users
            .hydrate(json!({"id": 2, "username": "bob", "login": "bob"}))
            .unwrap();
        assert_eq!(key, Some(Key::from("bob")));
        assert!(user.is_loaded());
    }
}
