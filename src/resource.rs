//! Resource lifecycle and resource collections.
//!
//! A [`Resource`] is a single remote entity. Concrete types only say which
//! endpoint serves each [`Operation`] (or that it is unsupported); loading,
//! creating, patching and deleting are provided here and drive the
//! Unloaded → Loaded → Deleted state machine.
//!
//! A [`ResourceCollection`] is a keyed, ordered set of resources of one type
//! that can be loaded from the server, searched, and sliced without touching
//! the receiver.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::collection::{Collection, Key};
use crate::error::{GogsError, Result};
use crate::params::{Arg, Params};
use crate::resolver::{FieldStore, Schema};
use crate::transport::Transport;

/// Version string reported in the user agent by entity types.
pub const ENTITY_VERSION: &str = "0.1.4";

/// Result count used by searches that do not ask for one.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Lifecycle state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Constructed locally, never confirmed by the server.
    Unloaded,
    /// Populated from a server response.
    Loaded,
    /// Deleted on the server; no further operations are accepted.
    Deleted,
}

/// Operations a resource type may map to an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Get,
    Create,
    Patch,
    Delete,
    Search,
    Migrate,
    Sync,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Patch => "patch",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::Migrate => "migrate",
            Operation::Sync => "sync",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode a response body into JSON.
pub fn decode(body: &str) -> Result<Value> {
    Ok(serde_json::from_str(body)?)
}

/// Codec error for a payload that is not the expected JSON shape.
pub(crate) fn expected_object(entity: &str) -> GogsError {
    GogsError::Codec(<serde_json::Error as serde::de::Error>::custom(format!(
        "expected a JSON object for {entity}"
    )))
}

/// State shared by every resource: transport, fields, lifecycle.
#[derive(Debug, Clone)]
pub struct ResourceCore {
    transport: Transport,
    fields: FieldStore,
    state: LoadState,
}

impl ResourceCore {
    pub fn new(transport: &Transport, entity: &'static str, schema: &'static Schema) -> Self {
        Self {
            transport: transport.for_entity(entity, ENTITY_VERSION),
            fields: FieldStore::new(schema),
            state: LoadState::Unloaded,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn mark_loaded(&mut self) {
        self.state = LoadState::Loaded;
    }

    /// Reject any operation on a deleted resource.
    pub fn ensure_live(&self, op: Operation) -> Result<()> {
        if self.state == LoadState::Deleted {
            return Err(GogsError::InvalidMethodRequest(format!(
                "::{op}:: resource was deleted"
            )));
        }
        Ok(())
    }
}

/// Value wanted for one field in a [`SearchQuery`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchValue {
    /// Case-insensitive substring of the field's value.
    Text(String),
    /// Query applied to a nested object field (e.g. a repo's `owner`).
    Nested(SearchQuery),
}

/// Field/value pairs matched against a resource's fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    terms: Vec<(String, SearchValue)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, field: &str, needle: &str) -> Self {
        self.terms
            .push((field.to_string(), SearchValue::Text(needle.to_string())));
        self
    }

    pub fn nested(mut self, field: &str, query: SearchQuery) -> Self {
        self.terms
            .push((field.to_string(), SearchValue::Nested(query)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SearchValue)> {
        self.terms.iter().map(|(f, v)| (f.as_str(), v))
    }
}

fn text_contains(value: &Value, needle: &str) -> bool {
    let haystack = match value {
        Value::Null => return false,
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    };
    haystack.contains(&needle.to_lowercase())
}

/// Evaluate `query` through `lookup`.
///
/// `lookup` returns `None` for an unknown field and `Some(None)` for a known
/// but unset one. Strict mode requires every term to match; otherwise the
/// first matching term wins.
fn match_query<'a>(
    lookup: &dyn Fn(&str) -> Option<Option<&'a Value>>,
    query: &SearchQuery,
    strict: bool,
) -> Result<bool> {
    if query.is_empty() {
        return Ok(false);
    }

    for (field, wanted) in query.iter() {
        let current = lookup(field)
            .ok_or_else(|| GogsError::SearchParam(format!("unknown field '{field}'")))?;

        let hit = match wanted {
            SearchValue::Text(needle) => current.is_some_and(|v| text_contains(v, needle)),
            SearchValue::Nested(inner) => match current {
                Some(Value::Object(obj)) => {
                    match_query(&|name: &str| obj.get(name).map(Some), inner, strict)?
                }
                Some(Value::Null) | None => false,
                Some(_) => {
                    return Err(GogsError::SearchParam(format!(
                        "field '{field}' is not searchable"
                    )))
                }
            },
        };

        if hit && !strict {
            return Ok(true);
        }
        if !hit && strict {
            return Ok(false);
        }
    }

    Ok(strict)
}

/// Match `query` against a field store.
pub fn match_fields(fields: &FieldStore, query: &SearchQuery, strict: bool) -> Result<bool> {
    match_query(
        &|name: &str| fields.contains(name).then(|| fields.get(name)),
        query,
        strict,
    )
}

/// A single remote entity with a lazy-loaded lifecycle.
#[async_trait]
pub trait Resource: Send + Sync + Sized {
    /// Type name reported in errors and the user agent.
    const ENTITY: &'static str;

    fn core(&self) -> &ResourceCore;

    fn core_mut(&mut self) -> &mut ResourceCore;

    /// Endpoint for `op`, or `None` when the type does not support it.
    ///
    /// Resolved afresh before every request.
    fn scope(&self, op: Operation) -> Result<Option<String>>;

    /// Named parameters for `create` from positional arguments.
    fn create_params(&self, _args: &[Arg]) -> Result<Params> {
        Ok(Params::new())
    }

    /// Body sent by `patch`.
    fn patch_params(&self) -> Params {
        self.core().fields().to_map().into_iter().collect()
    }

    /// Assign fields from a server payload and mark the resource loaded.
    fn populate(&mut self, payload: Value) -> Result<()> {
        let Value::Object(object) = payload else {
            return Err(expected_object(Self::ENTITY));
        };
        self.core_mut().fields_mut().populate(&object);
        self.core_mut().mark_loaded();
        Ok(())
    }

    fn required_scope(&self, op: Operation) -> Result<String> {
        self.scope(op)?.ok_or(GogsError::NotImplemented {
            operation: op.as_str(),
            entity: Self::ENTITY,
        })
    }

    fn state(&self) -> LoadState {
        self.core().state()
    }

    fn is_loaded(&self) -> bool {
        self.state() == LoadState::Loaded
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.core().fields().get(name)
    }

    /// Assigned fields as a JSON object keyed by bare field name.
    fn to_json(&self) -> Value {
        Value::Object(self.core().fields().to_map())
    }

    /// Change a field locally; nothing is sent until a write operation.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        self.core_mut().fields_mut().set(name, value).map(|_| ())
    }

    /// In-memory match against the resource's current fields.
    ///
    /// # Errors
    ///
    /// Returns [`GogsError::SearchParam`] for a field the type does not know.
    fn matches(&self, query: &SearchQuery, strict: bool) -> Result<bool> {
        match_fields(self.core().fields(), query, strict)
    }

    /// Fetch and populate the resource. A loaded resource is only fetched
    /// again when `force` is set.
    async fn load(&mut self, force: bool) -> Result<()> {
        self.core().ensure_live(Operation::Load)?;
        let scope = self.required_scope(Operation::Load)?;

        if self.is_loaded() && !force {
            return Ok(());
        }

        let body = self.core().transport().get(&scope, &Params::new()).await?;
        self.populate(decode(&body)?)
    }

    /// Create the entity remotely from positional arguments.
    ///
    /// # Errors
    ///
    /// Fails with [`GogsError::InvalidMethodRequest`] on a loaded resource,
    /// before any request is made.
    async fn create(&mut self, args: &[Arg]) -> Result<()> {
        self.core().ensure_live(Operation::Create)?;
        if self.is_loaded() {
            return Err(GogsError::InvalidMethodRequest(format!(
                "::create:: cannot create an already loaded {}; construct a new object",
                Self::ENTITY
            )));
        }
        let scope = self.required_scope(Operation::Create)?;

        let mut params = self.create_params(args)?;
        params.filter_params();

        let body = self.core().transport().post(&scope, &params).await?;
        self.populate(decode(&body)?)
    }

    /// Send local field changes.
    async fn patch(&mut self) -> Result<()> {
        self.core().ensure_live(Operation::Patch)?;
        if !self.is_loaded() {
            return Err(GogsError::InvalidMethodRequest(format!(
                "::patch:: cannot patch an unloaded {}; load it first",
                Self::ENTITY
            )));
        }
        let scope = self.required_scope(Operation::Patch)?;

        let params = self.patch_params();
        let body = self.core().transport().patch(&scope, &params).await?;
        self.populate(decode(&body)?)
    }

    /// Delete the entity remotely. A deleted resource rejects every later
    /// operation.
    async fn delete(&mut self) -> Result<bool> {
        self.core().ensure_live(Operation::Delete)?;
        let scope = self.required_scope(Operation::Delete)?;

        let deleted = self.core().transport().delete(&scope).await?;
        if deleted {
            self.core_mut().state = LoadState::Deleted;
        }
        Ok(deleted)
    }
}

/// Named sort orders for [`ResourceCollection::sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Key order.
    #[default]
    Index,
    Created,
    Updated,
    Owner,
}

/// Parameters for collection searches.
///
/// A query (`name`, aliased `q`) is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
    pub extra: Params,
}

impl SearchParams {
    pub fn new(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(name, value);
        self
    }

    /// Read `name`/`q` and `limit` out of loose parameters.
    pub fn from_params(params: &Params) -> Self {
        let mut extra = params.clone();
        let query = extra
            .remove("name")
            .or_else(|| extra.remove("q"))
            .and_then(|v| v.as_str().map(str::to_string));
        let limit = extra
            .remove("limit")
            .and_then(|v| v.as_u64())
            .and_then(|n| usize::try_from(n).ok());
        Self {
            query,
            limit,
            extra,
        }
    }

    /// The required query text.
    ///
    /// # Errors
    ///
    /// Returns [`GogsError::SearchParam`] when neither `name` nor `q` was given.
    pub fn require_query(&self) -> Result<&str> {
        self.query
            .as_deref()
            .ok_or_else(|| GogsError::SearchParam("Missing param <name>|<q>".to_string()))
    }

    pub fn limit_or_default(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

/// State shared by every collection: transport, entries, loaded flag.
#[derive(Debug, Clone)]
pub struct CollectionCore<T> {
    transport: Transport,
    items: Collection<Arc<T>>,
    loaded: bool,
}

impl<T> CollectionCore<T> {
    pub fn new(transport: &Transport, entity: &'static str) -> Self {
        Self {
            transport: transport.for_entity(entity, ENTITY_VERSION),
            items: Collection::new(),
            loaded: false,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn items(&self) -> &Collection<Arc<T>> {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Collection<Arc<T>> {
        &mut self.items
    }

    pub fn set_items(&mut self, items: Collection<Arc<T>>) {
        self.items = items;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }
}

/// Ordered, keyed set of resources of one type.
#[async_trait]
pub trait ResourceCollection: Send + Sync + Sized {
    type Item: Resource + Clone + 'static;

    /// Type name reported in errors and the user agent.
    const ENTITY: &'static str;

    fn core(&self) -> &CollectionCore<Self::Item>;

    fn core_mut(&mut self) -> &mut CollectionCore<Self::Item>;

    /// Endpoint for `op`, or `None` when unsupported.
    fn scope(&self, op: Operation) -> Result<Option<String>>;

    /// Build a loaded item from one payload object, with the key to store it
    /// under (`None` appends at the next index).
    fn hydrate(&self, object: Value) -> Result<(Option<Key>, Self::Item)>;

    /// Empty collection with the same owner and transport.
    fn empty_like(&self) -> Self;

    /// Comparator for a named sort order; `None` falls back to key order.
    fn comparator(_key: SortKey) -> Option<fn(&Self::Item, &Self::Item) -> Ordering> {
        None
    }

    /// Collection with the same owner holding `items`, loaded if `self` is.
    fn wrap(&self, items: Collection<Arc<Self::Item>>) -> Self {
        let mut collection = self.empty_like();
        collection.core_mut().set_items(items);
        if self.is_loaded() {
            collection.core_mut().mark_loaded();
        }
        collection
    }

    fn required_scope(&self, op: Operation) -> Result<String> {
        self.scope(op)?.ok_or(GogsError::NotImplemented {
            operation: op.as_str(),
            entity: Self::ENTITY,
        })
    }

    fn is_loaded(&self) -> bool {
        self.core().is_loaded()
    }

    /// Fetch every entry. A loaded collection is only fetched again when
    /// `force` is set.
    async fn load(&mut self, force: bool) -> Result<()> {
        let scope = self.required_scope(Operation::Load)?;
        if self.is_loaded() && !force {
            return Ok(());
        }

        let body = self.core().transport().get(&scope, &Params::new()).await?;
        // Entries are swapped in only once the whole payload hydrates.
        let mut fresh = self.empty_like();
        fresh.populate(decode(&body)?)?;
        let items = std::mem::take(fresh.core_mut().items_mut());
        self.core_mut().set_items(items);
        self.core_mut().mark_loaded();
        Ok(())
    }

    /// Hydrate and add every entry of a payload, returning their keys.
    ///
    /// Accepts a bare array or a `{"data": [...]}` envelope.
    fn populate(&mut self, payload: Value) -> Result<Vec<Key>> {
        let entries = match payload {
            Value::Array(entries) => entries,
            Value::Object(mut envelope) if envelope.contains_key("data") => {
                match envelope.remove("data") {
                    Some(Value::Array(entries)) => entries,
                    Some(Value::Null) | None => Vec::new(),
                    Some(_) => return Err(expected_object(Self::ENTITY)),
                }
            }
            Value::Null => Vec::new(),
            _ => return Err(expected_object(Self::ENTITY)),
        };

        let mut keys = Vec::with_capacity(entries.len());
        for entry in entries {
            let (key, item) = self.hydrate(entry)?;
            keys.push(self.add(item, key));
        }
        Ok(keys)
    }

    /// Insert an item; without a key it gets the next integer index.
    fn add(&mut self, item: Self::Item, key: Option<Key>) -> Key {
        self.core_mut().items_mut().add(Arc::new(item), key)
    }

    fn add_shared(&mut self, item: Arc<Self::Item>, key: Option<Key>) -> Key {
        self.core_mut().items_mut().add(item, key)
    }

    fn remove(&mut self, key: &Key) -> Option<Arc<Self::Item>> {
        self.core_mut().items_mut().remove(key)
    }

    fn by_key(&self, key: &Key) -> Option<Arc<Self::Item>> {
        self.core().items().by_key(key).cloned()
    }

    fn len(&self) -> usize {
        self.core().items().len()
    }

    fn is_empty(&self) -> bool {
        self.core().items().is_empty()
    }

    fn items(&self) -> &Collection<Arc<Self::Item>> {
        self.core().items()
    }

    fn all(&self) -> Vec<(Key, Arc<Self::Item>)> {
        self.core().items().all()
    }

    fn filter<F>(&self, mut predicate: F) -> Collection<Arc<Self::Item>>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        self.core().items().filter(|item| predicate(&**item))
    }

    fn limit(&self, n: usize) -> Collection<Arc<Self::Item>> {
        self.core().items().limit(n)
    }

    fn offset(&self, n: usize) -> Collection<Arc<Self::Item>> {
        self.core().items().offset(n)
    }

    fn reverse(&self) -> Collection<Arc<Self::Item>> {
        self.core().items().reverse()
    }

    fn sort<F>(&self, mut compare: F) -> Collection<Arc<Self::Item>>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        self.core().items().sort(|a, b| compare(&**a, &**b))
    }

    /// New collection of the same type in the named order, oldest/smallest
    /// first unless `descending`.
    fn sort_by(&self, key: SortKey, descending: bool) -> Self {
        let sorted = match Self::comparator(key) {
            Some(compare) => self.sort(compare),
            None => self.core().items().sort_keys(),
        };
        let sorted = if descending { sorted.reverse() } else { sorted };
        self.wrap(sorted)
    }

    /// In-memory search over the current entries, testing `fields` against
    /// the query and stopping at the limit. A limit of 0 does not cap.
    fn search_loaded(&self, params: &SearchParams, fields: &[&str], strict: bool) -> Result<Self> {
        let needle = params.require_query()?;
        let limit = params.limit_or_default();
        let query = fields
            .iter()
            .fold(SearchQuery::new(), |q, field| q.text(field, needle));

        let mut found = self.empty_like();
        for (key, item) in self.core().items().iter() {
            if limit != 0 && found.len() >= limit {
                break;
            }
            if item.matches(&query, strict)? {
                found.add_shared(Arc::clone(item), Some(key.clone()));
            }
        }
        if self.is_loaded() {
            found.core_mut().mark_loaded();
        }
        Ok(found)
    }

    /// Run the remote search endpoint and hydrate the results into a fresh
    /// collection. The receiver is left untouched.
    async fn search_remote(&self, query: &Params) -> Result<Self> {
        let scope = self.required_scope(Operation::Search)?;
        let body = self.core().transport().get(&scope, query).await?;

        let mut found = self.empty_like();
        found.populate(decode(&body)?)?;
        Ok(found)
    }

    /// Search entries; returns a new, possibly empty collection.
    async fn search(&mut self, params: &SearchParams, strict: bool) -> Result<Self>;

    /// Cached entry for `id`, or a freshly loaded one that is then cached.
    async fn get(&mut self, id: &str) -> Result<Arc<Self::Item>>;

    /// A new item; created remotely and added when `args` is non-empty.
    async fn create(&mut self, args: &[Arg]) -> Result<Self::Item>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::RequestLog;
    use serde_json::json;

    static WIDGET: Schema = Schema::new("widget", &["name", "color", "maker"], None);

    #[derive(Debug, Clone)]
    struct Widget {
        core: ResourceCore,
    }

    impl Widget {
        fn new() -> Self {
            let transport =
                Transport::new("http://127.0.0.1:9/api/v1", "t", RequestLog::new()).unwrap();
            Self {
                core: ResourceCore::new(&transport, "Widget", &WIDGET),
            }
        }

        fn loaded(payload: Value) -> Self {
            let mut widget = Self::new();
            widget.populate(payload).unwrap();
            widget
        }
    }

    impl Resource for Widget {
        const ENTITY: &'static str = "Widget";

        fn core(&self) -> &ResourceCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ResourceCore {
            &mut self.core
        }

        fn scope(&self, op: Operation) -> Result<Option<String>> {
            Ok(match op {
                Operation::Load => Some("/widgets/1".to_string()),
                _ => None,
            })
        }
    }

    fn widget() -> Widget {
        Widget::loaded(json!({
            "name": "Sprocket",
            "color": "Blue",
            "maker": {"username": "acme", "id": 3}
        }))
    }

    #[test]
    fn test_non_strict_is_or() {
        let query = SearchQuery::new().text("name", "nomatch").text("color", "blu");
        assert!(widget().matches(&query, false).unwrap());
        assert!(!widget().matches(&query, true).unwrap());
    }

    #[test]
    fn test_strict_is_and() {
        let query = SearchQuery::new().text("name", "SPROCK").text("color", "blue");
        assert!(widget().matches(&query, true).unwrap());
    }

    #[test]
    fn test_nested_search() {
        let query = SearchQuery::new().nested("maker", SearchQuery::new().text("username", "AC"));
        assert!(widget().matches(&query, false).unwrap());
        assert!(widget().matches(&query, true).unwrap());

        let miss = SearchQuery::new().nested("maker", SearchQuery::new().text("username", "zz"));
        assert!(!widget().matches(&miss, true).unwrap());
    }

    #[test]
    fn test_unknown_field_is_param_error() {
        let query = SearchQuery::new().text("weight", "1");
        let err = widget().matches(&query, false).unwrap_err();
        assert!(matches!(err, GogsError::SearchParam(_)));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(!widget().matches(&SearchQuery::new(), true).unwrap());
    }

    #[test]
    fn test_populate_marks_loaded() {
        let w = widget();
        assert_eq!(w.state(), LoadState::Loaded);
        assert_eq!(w.field("color"), Some(&json!("Blue")));
    }

    #[test]
    fn test_populate_rejects_non_object() {
        let mut w = Widget::new();
        assert!(matches!(w.populate(json!([1, 2])), Err(GogsError::Codec(_))));
        assert_eq!(w.state(), LoadState::Unloaded);
    }

    #[tokio::test]
    async fn test_create_on_loaded_is_invalid() {
        let mut w = widget();
        let err = w.create(&[]).await.unwrap_err();
        assert!(matches!(err, GogsError::InvalidMethodRequest(_)));
    }

    #[tokio::test]
    async fn test_patch_on_unloaded_is_invalid() {
        let mut w = Widget::new();
        let err = w.patch().await.unwrap_err();
        assert!(matches!(err, GogsError::InvalidMethodRequest(_)));
    }

    #[tokio::test]
    async fn test_unsupported_operations_are_not_implemented() {
        let mut w = Widget::new();
        assert!(matches!(
            w.create(&[]).await.unwrap_err(),
            GogsError::NotImplemented { operation: "create", .. }
        ));
        assert!(matches!(
            w.delete().await.unwrap_err(),
            GogsError::NotImplemented { operation: "delete", .. }
        ));
        let mut loaded = widget();
        assert!(matches!(
            loaded.patch().await.unwrap_err(),
            GogsError::NotImplemented { operation: "patch", .. }
        ));
    }

    #[tokio::test]
    async fn test_load_is_noop_when_loaded() {
        // The transport points at a closed port; a request would fail.
        let mut w = widget();
        w.load(false).await.unwrap();
        assert!(w.is_loaded());
    }

    #[test]
    fn test_search_params_aliases() {
        let params: Params = [("q", json!("alice")), ("limit", json!(3))]
            .into_iter()
            .collect();
        let search = SearchParams::from_params(&params);
        assert_eq!(search.require_query().unwrap(), "alice");
        assert_eq!(search.limit_or_default(), 3);

        let missing = SearchParams::default();
        assert!(matches!(
            missing.require_query().unwrap_err(),
            GogsError::SearchParam(_)
        ));
        assert_eq!(missing.limit_or_default(), DEFAULT_SEARCH_LIMIT);
    }
}
