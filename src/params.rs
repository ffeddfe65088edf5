//! Positional-to-named parameter coercion for outgoing requests.
//!
//! Entity constructors accept arguments in the remote API's documented order
//! (required fields first). [`Params::set_param`] picks the argument at a
//! given position when its runtime type matches, otherwise the default, so
//! callers can pass partial or loosely typed argument lists.

use serde_json::{Map, Value};

use crate::error::{GogsError, Result};

/// A positional argument passed to `create`-style operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Arg {
    fn to_value(&self) -> Value {
        match self {
            Arg::Str(s) => Value::String(s.clone()),
            Arg::Int(i) => Value::from(*i),
            Arg::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Arg::Bool(b) => Value::Bool(*b),
            Arg::Null => Value::Null,
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Int(i)
    }
}

impl From<i32> for Arg {
    fn from(i: i32) -> Self {
        Arg::Int(i64::from(i))
    }
}

impl From<u32> for Arg {
    fn from(i: u32) -> Self {
        Arg::Int(i64::from(i))
    }
}

impl From<f64> for Arg {
    fn from(f: f64) -> Self {
        Arg::Float(f)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

/// Build a `Vec<Arg>` from heterogeneous values.
///
/// ```
/// let args = gogsapi::args!["my-repo", "A description", true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Arg::from($value)),*]
    };
}

/// Expected runtime type of a positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
}

impl ParamType {
    fn accepts(self, arg: &Arg) -> bool {
        matches!(
            (self, arg),
            (ParamType::Str, Arg::Str(_))
                | (ParamType::Int, Arg::Int(_))
                | (ParamType::Float, Arg::Float(_))
                | (ParamType::Bool, Arg::Bool(_))
        )
    }
}

/// Ordered, named request parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `args[index]` into parameter `name`.
    ///
    /// The argument is used when present and of type `ty`; otherwise
    /// `default` is stored.
    pub fn set_param(
        &mut self,
        name: &str,
        args: &[Arg],
        index: usize,
        ty: ParamType,
        default: Value,
    ) -> &mut Self {
        let value = Self::coerce(args, index, ty, &default);
        self.insert(name, value);
        self
    }

    /// Like [`set_param`](Self::set_param), then run `validator` when the
    /// resolved value differs from `default`.
    pub fn set_param_with<F>(
        &mut self,
        name: &str,
        args: &[Arg],
        index: usize,
        ty: ParamType,
        default: Value,
        validator: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&Value) -> Result<()>,
    {
        let value = Self::coerce(args, index, ty, &default);
        if value != default {
            validator(&value)?;
        }
        self.insert(name, value);
        Ok(self)
    }

    fn coerce(args: &[Arg], index: usize, ty: ParamType, default: &Value) -> Value {
        match args.get(index) {
            Some(arg) if ty.accepts(arg) => arg.to_value(),
            _ => default.clone(),
        }
    }

    /// Drop every parameter whose value is null.
    pub fn filter_params(&mut self) -> &mut Self {
        self.entries.retain(|(_, v)| !v.is_null());
        self
    }

    /// Insert or replace a parameter. Replacing keeps the original position.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Move the value of `from` to `to`, replacing any existing `to`.
    pub fn rename(&mut self, from: &str, to: &str) -> &mut Self {
        if let Some(value) = self.remove(from) {
            self.insert(to, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode as a URL query string; booleans render as `true`/`false`.
    pub fn to_query(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&query_value(value))
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Encode as a JSON object body, or `None` when there is nothing to send.
    pub fn to_json(&self) -> Result<Option<String>> {
        if self.entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&self.to_map())?))
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.entries.iter().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(&k.into(), v);
        }
        params
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Validator that accepts only absolute URLs (or local paths for migration
/// sources that live on the server's disk).
pub fn validate_clone_address(name: &str, value: &Value) -> Result<()> {
    let addr = value.as_str().unwrap_or_default();
    if addr.starts_with('/') {
        return Ok(());
    }
    url::Url::parse(addr)
        .map(|_| ())
        .map_err(|e| GogsError::InvalidParam {
            name: name.to_string(),
            reason: format!("'{addr}' is not a valid address: {e}"),
        })
}
