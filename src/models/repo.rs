//! Repository model and repository collections.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::collection::Key;
use crate::error::{GogsError, Result};
use crate::models::{Branches, Org, OwnerKind, OwnerRef, RepoRef, User};
use crate::params::{validate_clone_address, Arg, ParamType, Params};
use crate::resolver::Schema;
use crate::resource::{
    decode, expected_object, CollectionCore, Operation, Resource, ResourceCollection,
    ResourceCore, SearchParams, SortKey,
};
use crate::transport::Transport;

/// Fields of a Gogs repository.
pub static REPO: Schema = Schema::new(
    "repo",
    &[
        "id",
        "owner",
        "name",
        "full_name",
        "description",
        "private",
        "fork",
        "parent",
        "empty",
        "mirror",
        "size",
        "html_url",
        "ssh_url",
        "clone_url",
        "website",
        "stars_count",
        "forks_count",
        "watchers_count",
        "open_issues_count",
        "default_branch",
        "created_at",
        "updated_at",
        "permissions",
    ],
    None,
);

fn parse_date(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

/// Numeric id of `owner`, loading the owner when it is not known.
async fn resolve_owner_id(transport: &Transport, owner: &OwnerRef) -> Result<i64> {
    if let Some(id) = owner.id {
        return Ok(id);
    }

    let id = match owner.kind {
        OwnerKind::Org => {
            let mut org = Org::new(transport, None, owner.require_username(Operation::Load)?);
            org.load(false).await?;
            org.id()
        }
        OwnerKind::AuthenticatedUser => {
            let mut user = User::new(transport, "");
            user.load(false).await?;
            user.id()
        }
        OwnerKind::User => {
            let mut user = User::new(transport, owner.require_username(Operation::Load)?);
            user.load(false).await?;
            user.id()
        }
    };
    id.ok_or_else(|| GogsError::InvalidMethodRequest("missing owner 'id'".to_string()))
}

/// A Gogs repository.
///
/// Supported endpoints:
///
/// * GET `/repos/{owner}/{name}`
/// * POST `/user/repos`, `/admin/users/{owner}/repos` or `/org/{org}/repos`
/// * DELETE `/repos/{owner}/{name}`
/// * POST `/repos/migrate`
/// * POST `/repos/{owner}/{name}/mirror-sync`
#[derive(Debug, Clone)]
pub struct Repo {
    core: ResourceCore,
    owner: Option<OwnerRef>,
}

impl Repo {
    pub fn new(transport: &Transport, owner: Option<OwnerRef>, name: &str) -> Self {
        let mut core = ResourceCore::new(transport, Self::ENTITY, &REPO);
        if !name.is_empty() {
            core.fields_mut().assign("name", name);
        }
        Self { core, owner }
    }

    /// A repository addressed as `owner/name`.
    pub fn from_full_name(transport: &Transport, full_name: &str) -> Self {
        let mut repo = Self::new(transport, None, "");
        match RepoRef::parse(full_name) {
            Some(r) => {
                repo.owner = Some(OwnerRef::user(&r.owner));
                repo.core.fields_mut().assign("name", r.name);
            }
            None => {
                repo.core.fields_mut().assign("full_name", full_name);
            }
        }
        repo
    }

    pub fn id(&self) -> Option<i64> {
        self.core.fields().i64("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.core.fields().str("name")
    }

    pub fn full_name(&self) -> Option<&str> {
        self.core.fields().str("full_name")
    }

    pub fn description(&self) -> Option<&str> {
        self.core.fields().str("description")
    }

    pub fn is_private(&self) -> bool {
        self.core.fields().bool("private").unwrap_or(false)
    }

    pub fn is_fork(&self) -> bool {
        self.core.fields().bool("fork").unwrap_or(false)
    }

    pub fn is_mirror(&self) -> bool {
        self.core.fields().bool("mirror").unwrap_or(false)
    }

    pub fn html_url(&self) -> Option<&str> {
        self.core.fields().str("html_url")
    }

    pub fn clone_url(&self) -> Option<&str> {
        self.core.fields().str("clone_url")
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.core.fields().str("default_branch")
    }

    pub fn stars_count(&self) -> i64 {
        self.core.fields().i64("stars_count").unwrap_or(0)
    }

    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_date(self.core.fields().str("created_at"))
    }

    pub fn updated_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_date(self.core.fields().str("updated_at"))
    }

    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().and_then(|o| o.username.as_deref())
    }

    fn require_owner(&self, op: Operation) -> Result<&OwnerRef> {
        self.owner.as_ref().ok_or_else(|| {
            GogsError::InvalidMethodRequest(format!("::{op}:: repository has no owner"))
        })
    }

    fn require_name(&self, op: Operation) -> Result<&str> {
        self.name().filter(|n| !n.is_empty()).ok_or_else(|| {
            GogsError::InvalidMethodRequest(format!("::{op}:: missing repository 'name'"))
        })
    }

    /// `owner/name` identity of the repository.
    pub fn repo_ref(&self, op: Operation) -> Result<RepoRef> {
        let owner = self.require_owner(op)?.require_username(op)?;
        Ok(RepoRef::new(owner, self.require_name(op)?))
    }

    /// Branches of the repository.
    pub fn branches(&self) -> Result<Branches> {
        Ok(Branches::new(
            self.core.transport(),
            self.repo_ref(Operation::Load)?,
        ))
    }

    /// Migrate an external repository into this one's owner.
    ///
    /// Positional order: clone_addr, repo_name, auth_username, auth_password,
    /// mirror, private, description. `uid` is taken from the owner.
    pub async fn migrate(&mut self, args: &[Arg]) -> Result<()> {
        self.core.ensure_live(Operation::Migrate)?;
        let owner = self.require_owner(Operation::Migrate)?.clone();
        let scope = self.required_scope(Operation::Migrate)?;
        let uid = resolve_owner_id(self.core.transport(), &owner).await?;

        let mut params = Params::new();
        params.set_param_with("clone_addr", args, 0, ParamType::Str, Value::Null, |v| {
            validate_clone_address("clone_addr", v)
        })?;
        params
            .set_param("repo_name", args, 1, ParamType::Str, Value::Null)
            .set_param("auth_username", args, 2, ParamType::Str, Value::Null)
            .set_param("auth_password", args, 3, ParamType::Str, Value::Null)
            .set_param("mirror", args, 4, ParamType::Bool, Value::Bool(false))
            .set_param("private", args, 5, ParamType::Bool, Value::Bool(false))
            .set_param("description", args, 6, ParamType::Str, Value::Null)
            .insert("uid", uid)
            .filter_params();

        let body = self.core.transport().post(&scope, &params).await?;
        self.populate(decode(&body)?)
    }

    /// Ask the server to sync a mirror. Returns `false` without a request
    /// when the repository is not a mirror.
    pub async fn sync(&self) -> Result<bool> {
        self.core.ensure_live(Operation::Sync)?;
        if !self.is_mirror() {
            return Ok(false);
        }
        let scope = self.required_scope(Operation::Sync)?;
        self.core.transport().post(&scope, &Params::new()).await?;
        Ok(true)
    }
}

#[async_trait]
impl Resource for Repo {
    const ENTITY: &'static str = "Repo";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Create => {
                let owner = self.require_owner(op)?;
                Some(match owner.kind {
                    OwnerKind::Org => format!("/org/{}/repos", owner.require_username(op)?),
                    OwnerKind::AuthenticatedUser => "/user/repos".to_string(),
                    OwnerKind::User => {
                        format!("/admin/users/{}/repos", owner.require_username(op)?)
                    }
                })
            }
            Operation::Delete => Some(format!("/repos/{}", self.repo_ref(op)?.full_name())),
            Operation::Get | Operation::Load => {
                let owner = self.owner.as_ref().and_then(|o| o.username.as_deref());
                match (owner, self.name(), self.full_name()) {
                    (Some(owner), Some(name), _) => Some(format!("/repos/{owner}/{name}")),
                    (_, _, Some(full_name)) => Some(format!("/repos/{full_name}")),
                    _ => {
                        return Err(GogsError::InvalidMethodRequest(format!(
                            "::{op}:: missing owner 'username' and/or 'full_name'"
                        )))
                    }
                }
            }
            Operation::Migrate => Some("/repos/migrate".to_string()),
            Operation::Sync => Some(format!(
                "/repos/{}/mirror-sync",
                self.repo_ref(op)?.full_name()
            )),
            _ => None,
        })
    }

    /// Positional order: name, description, private, auto_init, gitignores,
    /// license, readme.
    fn create_params(&self, args: &[Arg]) -> Result<Params> {
        let mut params = Params::new();
        params
            .set_param("name", args, 0, ParamType::Str, Value::Null)
            .set_param("description", args, 1, ParamType::Str, Value::Null)
            .set_param("private", args, 2, ParamType::Bool, Value::Bool(false))
            .set_param("auto_init", args, 3, ParamType::Bool, Value::Bool(false))
            .set_param("gitignores", args, 4, ParamType::Str, Value::Null)
            .set_param("license", args, 5, ParamType::Str, Value::Null)
            .set_param("readme", args, 6, ParamType::Str, Value::from("Default"));
        Ok(params)
    }

    /// Also captures the embedded `owner` object as the association.
    fn populate(&mut self, payload: Value) -> Result<()> {
        let Value::Object(object) = payload else {
            return Err(expected_object(Self::ENTITY));
        };

        if let Some(found) = object.get("owner").and_then(OwnerRef::from_payload) {
            match &mut self.owner {
                Some(owner) => owner.merge(&found),
                None => self.owner = Some(found),
            }
        }

        self.core.fields_mut().populate(&object);
        self.core.mark_loaded();
        Ok(())
    }
}

/// Repositories of one owner, or of the authenticated user.
#[derive(Debug, Clone)]
pub struct Repos {
    core: CollectionCore<Repo>,
    owner: Option<OwnerRef>,
}

impl Repos {
    pub fn new(transport: &Transport, owner: Option<OwnerRef>) -> Self {
        Self {
            core: CollectionCore::new(transport, Self::ENTITY),
            owner,
        }
    }

    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref()
    }

    fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref().and_then(|o| o.username.as_deref())
    }

    pub fn privates(&self) -> Self {
        self.wrap(self.filter(Repo::is_private))
    }

    pub fn publics(&self) -> Self {
        self.wrap(self.filter(|r| !r.is_private()))
    }

    /// Repositories owned by the collection's owner.
    pub fn personals(&self) -> Self {
        match self.owner_name() {
            Some(owner) => self.wrap(self.filter(|r| r.owner_name() == Some(owner))),
            None => self.empty_like(),
        }
    }

    /// Repositories the owner contributes to but does not own.
    pub fn contributions(&self) -> Self {
        match self.owner_name() {
            Some(owner) => self.wrap(self.filter(|r| r.owner_name() != Some(owner))),
            None => self.empty_like(),
        }
    }
}

fn by_created(a: &Repo, b: &Repo) -> Ordering {
    a.created_at().cmp(&b.created_at())
}

fn by_updated(a: &Repo, b: &Repo) -> Ordering {
    a.updated_at().cmp(&b.updated_at())
}

fn by_owner(a: &Repo, b: &Repo) -> Ordering {
    a.owner_name().cmp(&b.owner_name())
}

#[async_trait]
impl ResourceCollection for Repos {
    type Item = Repo;

    const ENTITY: &'static str = "Repos";

    fn core(&self) -> &CollectionCore<Repo> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CollectionCore<Repo> {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Get | Operation::Load => Some(match &self.owner {
                Some(owner) => owner.collection_scope("repos", op)?,
                None => "/user/repos".to_string(),
            }),
            Operation::Search => Some("/repos/search".to_string()),
            _ => None,
        })
    }

    fn hydrate(&self, object: Value) -> Result<(Option<Key>, Repo)> {
        let mut repo = Repo::new(self.core.transport(), None, "");
        repo.populate(object)?;
        let key = repo.full_name().map(Key::from);
        Ok((key, repo))
    }

    fn empty_like(&self) -> Self {
        Self::new(self.core.transport(), self.owner.clone())
    }

    fn comparator(key: SortKey) -> Option<fn(&Repo, &Repo) -> Ordering> {
        match key {
            SortKey::Created => Some(by_created),
            SortKey::Updated => Some(by_updated),
            SortKey::Owner => Some(by_owner),
            SortKey::Index => None,
        }
    }

    /// Matches `name` and `description` in memory when loaded; otherwise asks
    /// `/repos/search`, scoped to the owner's id.
    async fn search(&mut self, params: &SearchParams, strict: bool) -> Result<Self> {
        let needle = params.require_query()?.to_string();
        if self.is_loaded() {
            return self.search_loaded(params, &["name", "description"], strict);
        }

        let mut query = params.extra.clone();
        let uid = match &self.owner {
            Some(owner) => resolve_owner_id(self.core.transport(), owner).await?,
            None => query.get("uid").and_then(Value::as_i64).unwrap_or(0),
        };
        query
            .insert("q", needle)
            .insert("uid", uid)
            .insert("limit", params.limit_or_default() as u64);
        self.search_remote(&query).await
    }

    /// `name` may be bare (relative to the owner) or `owner/name`.
    async fn get(&mut self, id: &str) -> Result<Arc<Repo>> {
        let full_name = match self.owner_name() {
            Some(owner) if !id.contains('/') => format!("{owner}/{id}"),
            _ => id.to_string(),
        };
        if let Some(repo) = self.by_key(&Key::from(full_name.as_str())) {
            return Ok(repo);
        }

        let mut repo = match (&self.owner, RepoRef::parse(&full_name)) {
            (Some(owner), Some(r)) if owner.username.as_deref() == Some(r.owner.as_str()) => {
                Repo::new(self.core.transport(), Some(owner.clone()), &r.name)
            }
            _ => Repo::from_full_name(self.core.transport(), &full_name),
        };
        repo.load(false).await?;

        let key = repo.full_name().unwrap_or(&full_name).to_string();
        let repo = Arc::new(repo);
        self.add_shared(Arc::clone(&repo), Some(Key::Name(key)));
        Ok(repo)
    }

    async fn create(&mut self, args: &[Arg]) -> Result<Repo> {
        let mut repo = Repo::new(self.core.transport(), self.owner.clone(), "");
        if !args.is_empty() {
            repo.create(args).await?;
            let key = repo.full_name().map(Key::from);
            self.add(repo.clone(), key);
        }
        Ok(repo)
    }
}
