//! Access tokens of a user.
//!
//! Token endpoints only accept basic auth as the owning user (email and
//! personal password), so both types carry a basic-auth transport.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::Key;
use crate::error::{GogsError, Result};
use crate::params::{Arg, ParamType, Params};
use crate::resolver::Schema;
use crate::resource::{
    expected_object, CollectionCore, Operation, Resource, ResourceCollection, ResourceCore,
    SearchParams,
};
use crate::transport::Transport;

pub static TOKEN: Schema = Schema::new("token", &["name", "sha1"], None);

/// A personal access token.
#[derive(Debug, Clone)]
pub struct Token {
    core: ResourceCore,
    owner: String,
}

impl Token {
    /// `transport` must already authenticate as the owner.
    pub fn new(transport: &Transport, owner: &str) -> Self {
        Self {
            core: ResourceCore::new(transport, Self::ENTITY, &TOKEN),
            owner: owner.to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> Option<&str> {
        self.core.fields().str("name")
    }

    pub fn sha1(&self) -> Option<&str> {
        self.core.fields().str("sha1")
    }
}

#[async_trait]
impl Resource for Token {
    const ENTITY: &'static str = "Token";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Create => Some(format!("/users/{}/tokens", self.owner)),
            _ => None,
        })
    }

    /// Positional order: name.
    fn create_params(&self, args: &[Arg]) -> Result<Params> {
        let mut params = Params::new();
        params.set_param("name", args, 0, ParamType::Str, Value::Null);
        Ok(params)
    }
}

/// Tokens of one user.
#[derive(Debug, Clone)]
pub struct Tokens {
    core: CollectionCore<Token>,
    owner: String,
}

impl Tokens {
    /// Tokens of `owner`, authenticating as `email` with `password`.
    pub fn new(transport: &Transport, owner: &str, email: &str, password: &str) -> Self {
        Self::with_transport(&transport.basic(email, password), owner)
    }

    fn with_transport(transport: &Transport, owner: &str) -> Self {
        Self {
            core: CollectionCore::new(transport, Self::ENTITY),
            owner: owner.to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

#[async_trait]
impl ResourceCollection for Tokens {
    type Item = Token;

    const ENTITY: &'static str = "Tokens";

    fn core(&self) -> &CollectionCore<Token> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CollectionCore<Token> {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Load => Some(format!("/users/{}/tokens", self.owner)),
            _ => None,
        })
    }

    fn hydrate(&self, object: Value) -> Result<(Option<Key>, Token)> {
        if !object.is_object() {
            return Err(expected_object("Token"));
        }
        let mut token = Token::new(self.core.transport(), &self.owner);
        token.populate(object)?;
        let key = token.name().map(Key::from);
        Ok((key, token))
    }

    fn empty_like(&self) -> Self {
        Self::with_transport(self.core.transport(), &self.owner)
    }

    async fn search(&mut self, params: &SearchParams, strict: bool) -> Result<Self> {
        params.require_query()?;
        self.load(false).await?;
        self.search_loaded(params, &["name"], strict)
    }

    /// Tokens cannot be fetched one by one; the list is loaded and searched.
    async fn get(&mut self, id: &str) -> Result<Arc<Token>> {
        let key = Key::from(id);
        if let Some(token) = self.by_key(&key) {
            return Ok(token);
        }
        self.load(false).await?;
        self.by_key(&key).ok_or_else(|| GogsError::NotFound {
            entity: Token::ENTITY,
            id: id.to_string(),
        })
    }

    async fn create(&mut self, args: &[Arg]) -> Result<Token> {
        let mut token = Token::new(self.core.transport(), &self.owner);
        if !args.is_empty() {
            token.create(args).await?;
            let key = token.name().map(Key::from);
            self.add(token.clone(), key);
        }
        Ok(token)
    }
}
