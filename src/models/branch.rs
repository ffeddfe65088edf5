//! Branch model and a repository's branch collection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::Key;
use crate::error::{GogsError, Result};
use crate::models::RepoRef;
use crate::params::Arg;
use crate::resolver::Schema;
use crate::resource::{
    expected_object, CollectionCore, Operation, Resource, ResourceCollection, ResourceCore,
    SearchParams,
};
use crate::transport::Transport;

pub static BRANCH: Schema = Schema::new("branch", &["name", "commit"], None);

/// A branch of a repository. Read-only.
#[derive(Debug, Clone)]
pub struct Branch {
    core: ResourceCore,
    repo: RepoRef,
}

impl Branch {
    pub fn new(transport: &Transport, repo: RepoRef, name: &str) -> Self {
        let mut core = ResourceCore::new(transport, Self::ENTITY, &BRANCH);
        if !name.is_empty() {
            core.fields_mut().assign("name", name);
        }
        Self { core, repo }
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn name(&self) -> Option<&str> {
        self.core.fields().str("name")
    }

    /// Head commit object as returned by the server.
    pub fn commit(&self) -> Option<&Value> {
        self.core.fields().get("commit")
    }

    pub fn commit_id(&self) -> Option<&str> {
        self.commit().and_then(|c| c.get("id")).and_then(Value::as_str)
    }

    pub fn commit_message(&self) -> Option<&str> {
        self.commit()
            .and_then(|c| c.get("message"))
            .and_then(Value::as_str)
    }
}

#[async_trait]
impl Resource for Branch {
    const ENTITY: &'static str = "Branch";

    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Get | Operation::Load => {
                let name = self.name().filter(|n| !n.is_empty()).ok_or_else(|| {
                    GogsError::InvalidMethodRequest(format!("::{op}:: missing branch 'name'"))
                })?;
                Some(format!(
                    "/repos/{}/branches/{name}",
                    self.repo.full_name()
                ))
            }
            _ => None,
        })
    }
}

/// Branches of one repository.
#[derive(Debug, Clone)]
pub struct Branches {
    core: CollectionCore<Branch>,
    repo: RepoRef,
}

impl Branches {
    pub fn new(transport: &Transport, repo: RepoRef) -> Self {
        Self {
            core: CollectionCore::new(transport, Self::ENTITY),
            repo,
        }
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }
}

#[async_trait]
impl ResourceCollection for Branches {
    type Item = Branch;

    const ENTITY: &'static str = "Branches";

    fn core(&self) -> &CollectionCore<Branch> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CollectionCore<Branch> {
        &mut self.core
    }

    fn scope(&self, op: Operation) -> Result<Option<String>> {
        Ok(match op {
            Operation::Get | Operation::Load => {
                Some(format!("/repos/{}/branches", self.repo.full_name()))
            }
            _ => None,
        })
    }

    fn hydrate(&self, object: Value) -> Result<(Option<Key>, Branch)> {
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| expected_object("Branch"))?
            .to_string();
        let mut branch = Branch::new(self.core.transport(), self.repo.clone(), &name);
        branch.populate(object)?;
        Ok((Some(Key::Name(name)), branch))
    }

    fn empty_like(&self) -> Self {
        Self::new(self.core.transport(), self.repo.clone())
    }

    /// Loads every branch, then matches `name` in memory. Callers usually
    /// want `strict = true`.
    async fn search(&mut self, params: &SearchParams, strict: bool) -> Result<Self> {
        params.require_query()?;
        self.load(false).await?;
        self.search_loaded(params, &["name"], strict)
    }

    async fn get(&mut self, id: &str) -> Result<Arc<Branch>> {
        if let Some(branch) = self.by_key(&Key::from(id)) {
            return Ok(branch);
        }

        let mut branch = Branch::new(self.core.transport(), self.repo.clone(), id);
        branch.load(false).await?;
        let branch = Arc::new(branch);
        self.add_shared(Arc::clone(&branch), Some(Key::from(id)));
        Ok(branch)
    }

    async fn create(&mut self, _args: &[Arg]) -> Result<Branch> {
        Err(GogsError::NotImplemented {
            operation: Operation::Create.as_str(),
            entity: Self::ENTITY,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::RequestLog;
    use serde_json::json;

    fn branches() -> Branches {
        let t = Transport::new("http://127.0.0.1:9/api/v1", "t", RequestLog::new()).unwrap();
        Branches::new(&t, RepoRef::new("alice", "demo"))
    }

    #[test]
    fn test_scopes() {
        let b = branches();
        assert_eq!(
            b.scope(Operation::Load).unwrap().as_deref(),
            Some("/repos/alice/demo/branches")
        );
        let (_, branch) = b
            .hydrate(json!({"name": "main", "commit": {"id": "abc123", "message": "init"}}))
            .unwrap();
        assert_eq!(
            branch.scope(Operation::Load).unwrap().as_deref(),
            Some("/repos/alice/demo/branches/main")
        );
        assert_eq!(branch.commit_id(), Some("abc123"));
        assert_eq!(branch.commit_message(), Some("init"));
    }

    #[tokio::test]
    async fn test_create_not_implemented() {
        let mut b = branches();
        assert!(matches!(
            b.create(&[]).await.unwrap_err(),
            GogsError::NotImplemented { .. }
        ));
    }

    #[tokio::test]
    async fn test_loaded_search_is_strict_by_name() {
        let mut b = branches();
        b.populate(json!([{"name": "main"}, {"name": "feature/main-menu"}, {"name": "dev"}]))
            .unwrap();
        b.core_mut().mark_loaded();

        let found = b.search(&SearchParams::new("main"), true).await.unwrap();
        let keys: Vec<String> = found.items().keys().map(ToString::to_string).collect();
        assert_eq!(keys, ["main", "feature/main-menu"]);
    }
}
