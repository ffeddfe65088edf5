//! Organization model and a user's organization collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::Key;
use crate::error::{GogsError, Result};
use crate::models::user::USER;
use crate::models::{OwnerRef, Repos};
use crate::params::{Arg, ParamType, Params};
use crate::resolver::Schema;
use crate::resource::{
    expected_object, CollectionCore, Operation, Resource, ResourceCollection, ResourceCore,
    SearchParams,
};
use crate::transport::Transport;

/// Organization fields; everything else is inherited from [`USER`].
/// Fields of a Gogs organization. `full_name` is redeclared and shadows the
/// user field.
pub static ORG: Schema = Schema::new(
    "org",
    &["full_name", "description", "website", "location"],
    Some(&USER),
);

/// A Gogs organization.
///
/// Supported endpoints:
///
/// * GET `/orgs/{name}`
/// * POST `/admin/users/{owner}/orgs` (admin rights)
#[derive(Debug, Clone)]
pub struct Org {
    core: ResourceCore,
    owner: Option<OwnerRef>,
}

impl Org {
    pub fn new(transport: &Transport, owner: Option<OwnerRef>, name: &str) -> Self {
        let mut core = ResourceCore::new(transport, Self::ENTITY, &ORG);
        if !name.is_empty() {
            core.fields_mut().assign("username", name);
        }
        Self { core, owner }
    }

    pub fn id(&self) -> Option<i64> {
        self.core.fields().i64("id")
    }

    pub fn username(&self) -> Option<&str> {
        self.core.fields().str("username")
    }

    pub fn full_name(&self) -> Option<&str> {
        self.core.fields().str("full_name")
    }

    pub fn description(&self) -> Option<&str> {
        self.core.fields().str("description")
    }

    pub fn website(&self) -> Option<&str> {
        self.core.fields().str("website")
    }

    pub fn location(&self) -> Option<&str> {
        self.core.fields().str("location")
    }

    /// The user the organization was reached through.
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef {
            id: self.id(),
            ..OwnerRef::org(self.username().unwrap_or_default())
        }
    }

    /// Repositories owned by the organization.
    pub fn repos(&self) -> Repos {
        Repos::new(self.core.transport(), Some(self.owner_ref()))
    }
}

#[async_trait]
impl Resource for Org {
    const ENTITY: &'static str = "Org";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Create => {
                let owner = self.owner.as_ref().ok_or_else(|| {
                    GogsError::InvalidMethodRequest(
                        "::create:: cannot create an organization without a related user"
                            .to_string(),
                    )
                })?;
                Some(format!("/admin/users/{}/orgs", owner.require_username(op)?))
            }
            Operation::Get | Operation::Load => {
                let name = self.username().filter(|n| !n.is_empty()).ok_or_else(|| {
                    GogsError::InvalidMethodRequest(format!(
                        "::{op}:: missing organization 'username'"
                    ))
                })?;
                Some(format!("/orgs/{name}"))
            }
            _ => None,
        })
    }

    /// Positional order: username, full_name, description, website, location.
    fn create_params(&self, args: &[Arg]) -> Result<Params> {
        let mut params = Params::new();
        params
            .set_param("username", args, 0, ParamType::Str, Value::Null)
            .set_param("full_name", args, 1, ParamType::Str, Value::Null)
            .set_param("description", args, 2, ParamType::Str, Value::Null)
            .set_param("website", args, 3, ParamType::Str, Value::Null)
            .set_param("location", args, 4, ParamType::Str, Value::Null);
        Ok(params)
    }
}

/// Organizations of one user.
#[derive(Debug, Clone)]
pub struct Orgs {
    core: CollectionCore<Org>,
    owner: OwnerRef,
}

impl Orgs {
    pub fn new(transport: &Transport, owner: OwnerRef) -> Self {
        Self {
            core: CollectionCore::new(transport, Self::ENTITY),
            owner,
        }
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }
}

#[async_trait]
impl ResourceCollection for Orgs {
    type Item = Org;

    const ENTITY: &'static str = "Orgs";

    fn core(&self) -> &CollectionCore<Org> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CollectionCore<Org> {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Get | Operation::Load => Some(self.owner.collection_scope("orgs", op)?),
            _ => None,
        })
    }

    fn hydrate(&self, object: Value) -> Result<(Option<Key>, Org)> {
        let username = object
            .get("username")
            .and_then(Value::as_str)
            .ok_or_else(|| expected_object("Org"))?
            .to_string();
        let mut org = Org::new(self.core.transport(), Some(self.owner.clone()), &username);
        org.populate(object)?;
        Ok((Some(Key::Name(username)), org))
    }

    fn empty_like(&self) -> Self {
        Self::new(self.core.transport(), self.owner.clone())
    }

    /// Loads every organization, then matches `username` in memory.
    async fn search(&mut self, params: &SearchParams, strict: bool) -> Result<Self> {
        params.require_query()?;
        self.load(false).await?;
        self.search_loaded(params, &["username"], strict)
    }

    async fn get(&mut self, id: &str) -> Result<Arc<Org>> {
        if let Some(org) = self.by_key(&Key::from(id)) {
            return Ok(org);
        }

        let mut org = Org::new(self.core.transport(), Some(self.owner.clone()), id);
        org.load(false).await?;
        let org = Arc::new(org);
        self.add_shared(Arc::clone(&org), Some(Key::from(id)));
        Ok(org)
    }

    async fn create(&mut self, args: &[Arg]) -> Result<Org> {
        let mut org = Org::new(self.core.transport(), Some(self.owner.clone()), "");
        if !args.is_empty() {
            org.create(args).await?;
            let key = org.username().map(Key::from);
            self.add(org.clone(), key);
        }
        Ok(org)
    }
}
