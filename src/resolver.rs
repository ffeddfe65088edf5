//! Field resolution across an entity type and its parent.
//!
//! Each entity type declares a static [`Schema`]: a lowercase tag, the fields
//! it defines itself, and optionally the schema it specialises. A field lives
//! under the storage key `<tag>_<field>` of the type that defines it. Lookups
//! try the type itself first and then its direct parent only, so a type that
//! redeclares a parent field shadows it.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{GogsError, Result};

/// Field-descriptor table for one entity type.
#[derive(Debug)]
pub struct Schema {
    pub tag: &'static str,
    pub fields: &'static [&'static str],
    pub parent: Option<&'static Schema>,
}

/// Concrete storage slot for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey {
    pub tag: &'static str,
    pub field: &'static str,
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.tag, self.field)
    }
}

impl Schema {
    pub const fn new(
        tag: &'static str,
        fields: &'static [&'static str],
        parent: Option<&'static Schema>,
    ) -> Self {
        Self {
            tag,
            fields,
            parent,
        }
    }

    fn own(&'static self, name: &str) -> Option<StorageKey> {
        self.fields
            .iter()
            .copied()
            .find(|f| *f == name)
            .map(|field| StorageKey {
                tag: self.tag,
                field,
            })
    }

    /// Resolve a field name to its storage slot.
    ///
    /// Accepts bare names (`email`) and tag-qualified names (`user_email`).
    /// A name qualified with the type's own tag falls back to the parent
    /// when only the parent defines it. Only the type itself and its direct
    /// parent are consulted.
    pub fn resolve(&'static self, name: &str) -> Option<StorageKey> {
        if let Some(key) = self.own(name) {
            return Some(key);
        }
        if let Some(key) = self.parent.and_then(|p| p.own(name)) {
            return Some(key);
        }

        let parent = self.parent;
        if let Some(bare) = strip_tag(name, self.tag) {
            if let Some(key) = self.own(bare) {
                return Some(key);
            }
            if let Some(key) = parent.and_then(|p| p.own(bare)) {
                return Some(key);
            }
        }
        let parent = parent?;
        strip_tag(name, parent.tag).and_then(|bare| parent.own(bare))
    }

    /// Every field name visible on this type, own fields first.
    pub fn visible_fields(&'static self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.fields.to_vec();
        if let Some(parent) = self.parent {
            names.extend(
                parent
                    .fields
                    .iter()
                    .copied()
                    .filter(|f| !self.fields.contains(f)),
            );
        }
        names
    }

    /// Fields this type redeclares from its parent.
    pub fn shadowed(&'static self) -> Vec<&'static str> {
        match self.parent {
            Some(parent) => self
                .fields
                .iter()
                .copied()
                .filter(|f| parent.fields.contains(f))
                .collect(),
            None => Vec::new(),
        }
    }
}

fn strip_tag<'a>(name: &'a str, tag: &str) -> Option<&'a str> {
    name.strip_prefix(tag).and_then(|rest| rest.strip_prefix('_'))
}

/// Field values of one resource, keyed through its schema.
#[derive(Debug, Clone)]
pub struct FieldStore {
    schema: &'static Schema,
    values: BTreeMap<StorageKey, Value>,
}

impl FieldStore {
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn resolve(&self, name: &str) -> Option<StorageKey> {
        self.schema.resolve(name)
    }

    /// Whether the schema knows `name`, set or not.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Current value; `None` when unknown or never assigned.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.resolve(name).and_then(|key| self.values.get(&key))
    }

    /// Whether `name` holds a non-null value.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Assign a field, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`GogsError::UnknownField`] when neither the type nor its
    /// parent defines `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = self.resolve(name).ok_or_else(|| GogsError::UnknownField {
            entity: self.schema.tag,
            field: name.to_string(),
        })?;
        Ok(self.values.insert(key, value.into()))
    }

    /// Assign a field the caller knows the schema defines.
    ///
    /// Returns `false` (and reports it) when the name is unknown.
    pub fn assign(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.resolve(name) {
            Some(key) => {
                self.values.insert(key, value.into());
                true
            }
            None => {
                tracing::warn!(entity = self.schema.tag, field = %name, "unknown property");
                false
            }
        }
    }

    /// Assign every known field of a JSON object.
    ///
    /// Unknown fields are reported and dropped; their names are returned.
    pub fn populate(&mut self, object: &Map<String, Value>) -> Vec<String> {
        let mut unknown = Vec::new();
        for (name, value) in object {
            if !self.assign(name, value.clone()) {
                unknown.push(name.clone());
            }
        }
        unknown
    }

    /// Assigned fields keyed by bare field name.
    pub fn to_map(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(key, value)| (key.field.to_string(), value.clone()))
            .collect()
    }

    /// Assigned fields keyed by storage key.
    pub fn iter(&self) -> impl Iterator<Item = (&StorageKey, &Value)> {
        self.values.iter()
    }
}
