//! Ordered, keyed container with copy-on-transform views.
//!
//! [`Collection`] preserves insertion order and keeps keys unique (re-adding
//! a key replaces the value in place). `filter`, `limit`, `offset`,
//! `reverse`, `sort` and `sort_keys` take `&self` and return a new container;
//! only `add`/`remove` mutate the receiver.

use std::cmp::Ordering;
use std::fmt;

/// Key of a collection entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Positional key assigned when no key is given.
    Index(usize),
    /// Named key, e.g. a username or a repository's full name.
    Name(String),
}

impl Key {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

/// Ordered mapping from [`Key`] to value.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<V> {
    entries: Vec<(Key, V)>,
}

impl<V> Default for Collection<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Collection<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries; later duplicates of a key win.
    pub fn from_entries(entries: impl IntoIterator<Item = (Key, V)>) -> Self {
        let mut collection = Self::new();
        collection.extend(entries);
        collection
    }

    fn next_index(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|(k, _)| match k {
                Key::Index(i) => Some(i + 1),
                Key::Name(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Insert `value` under `key`, or under the next integer index when no
    /// key is given. Returns the effective key.
    pub fn add(&mut self, value: V, key: Option<Key>) -> Key {
        let key = key.unwrap_or_else(|| Key::Index(self.next_index()));
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key.clone(), value)),
        }
        key
    }

    /// Append a value under the next integer index.
    pub fn push(&mut self, value: V) -> Key {
        self.add(value, None)
    }

    /// Add every entry, keeping its key.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (Key, V)>) {
        for (key, value) in entries {
            self.add(value, Some(key));
        }
    }

    pub fn by_key(&self, key: &Key) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Shorthand for `by_key(&Key::Name(name))`.
    pub fn by_name(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_name() == Some(name))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.by_key(key).is_some()
    }

    pub fn remove(&mut self, key: &Key) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<(&Key, &V)> {
        self.entries.first().map(|(k, v)| (k, v))
    }
}

impl<V: PartialEq> Collection<V> {
    /// Remove entries holding `value`; only the first unless `deep`.
    pub fn remove_value(&mut self, value: &V, deep: bool) -> bool {
        let before = self.entries.len();
        if deep {
            self.entries.retain(|(_, v)| v != value);
        } else if let Some(pos) = self.entries.iter().position(|(_, v)| v == value) {
            self.entries.remove(pos);
        }
        self.entries.len() != before
    }
}

impl<V: Clone> Collection<V> {
    /// Copy of every entry in order.
    pub fn all(&self) -> Vec<(Key, V)> {
        self.entries.clone()
    }

    /// New container with the entries whose value satisfies `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&V) -> bool,
    {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(_, v)| predicate(v))
                .cloned()
                .collect(),
        }
    }

    /// New container with at most the first `n` entries.
    pub fn limit(&self, n: usize) -> Self {
        Self {
            entries: self.entries.iter().take(n).cloned().collect(),
        }
    }

    /// New container without the first `n` entries.
    pub fn offset(&self, n: usize) -> Self {
        Self {
            entries: self.entries.iter().skip(n).cloned().collect(),
        }
    }

    pub fn reverse(&self) -> Self {
        Self {
            entries: self.entries.iter().rev().cloned().collect(),
        }
    }

    /// New container stably sorted by `compare` on values.
    pub fn sort<F>(&self, mut compare: F) -> Self
    where
        F: FnMut(&V, &V) -> Ordering,
    {
        let mut entries = self.entries.clone();
        entries.sort_by(|(_, a), (_, b)| compare(a, b));
        Self { entries }
    }

    /// New container sorted by key; indices order before names.
    pub fn sort_keys(&self) -> Self {
        let mut entries = self.entries.clone();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self { entries }
    }
}

impl<V> IntoIterator for Collection<V> {
    type Item = (Key, V);
    type IntoIter = std::vec::IntoIter<(Key, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V> FromIterator<(Key, V)> for Collection<V> {
    fn from_iter<I: IntoIterator<Item = (Key, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers() -> Collection<i32> {
        let mut c = Collection::new();
        for n in [5, 3, 9, 1] {
            c.push(n);
        }
        c
    }

    fn values(c: &Collection<i32>) -> Vec<i32> {
        c.values().copied().collect()
    }

    #[test]
    fn test_add_assigns_sequential_indices() {
        let mut c = Collection::new();
        assert_eq!(c.add("a", None), Key::Index(0));
        assert_eq!(c.add("b", Some("named".into())), Key::from("named"));
        assert_eq!(c.add("c", None), Key::Index(1));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_last_write_wins_in_place() {
        let mut c = Collection::new();
        c.add(1, Some("x".into()));
        c.add(2, Some("y".into()));
        c.add(3, Some("x".into()));
        assert_eq!(values(&c), vec![3, 2]);
    }

    #[test]
    fn test_by_key_missing_is_none() {
        let c = numbers();
        assert_eq!(c.by_key(&Key::Index(2)), Some(&9));
        assert_eq!(c.by_key(&Key::Index(42)), None);
        assert_eq!(c.by_name("nope"), None);
    }

    #[test]
    fn test_filter_leaves_receiver_untouched() {
        let c = numbers();
        let before = c.all();
        let odd_big = c.filter(|n| *n > 4);
        assert_eq!(values(&odd_big), vec![5, 9]);
        assert_eq!(c.all(), before);
    }

    #[test]
    fn test_limit_and_offset_lengths() {
        let c = numbers();
        for n in 0..6 {
            assert_eq!(c.limit(n).len(), n.min(c.len()));
            assert_eq!(c.offset(n).len(), c.len().saturating_sub(n));
        }
        assert_eq!(values(&c.limit(2)), vec![5, 3]);
        assert_eq!(values(&c.offset(3)), vec![1]);
    }

    #[test]
    fn test_reverse_round_trip() {
        let c = numbers();
        assert_eq!(values(&c.reverse()), vec![1, 9, 3, 5]);
        assert_eq!(c.reverse().reverse().all(), c.all());
    }

    #[test]
    fn test_sort_keeps_keys() {
        let c = numbers();
        let sorted = c.sort(|a, b| a.cmp(b));
        assert_eq!(values(&sorted), vec![1, 3, 5, 9]);
        assert_eq!(sorted.first(), Some((&Key::Index(3), &1)));
        assert_eq!(values(&c), vec![5, 3, 9, 1]);
    }

    #[test]
    fn test_independent_sort_offset_chains() {
        let base = numbers();
        let first = base.sort(|a, b| a.cmp(b)).offset(1);
        let mut second = base.sort(|a, b| a.cmp(b)).offset(1);
        second.add(100, Some("extra".into()));
        second.remove(&Key::Index(2));

        assert_eq!(values(&first), vec![3, 5, 9]);
        assert_eq!(values(&second), vec![3, 5, 100]);
        assert_eq!(base.len(), 4);
    }

    #[test]
    fn test_sort_keys_orders_indices_then_names() {
        let mut c = Collection::new();
        c.add("z", Some("zed".into()));
        c.add("a", Some("alpha".into()));
        c.push("first");
        let keys: Vec<String> = c.sort_keys().keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["0", "alpha", "zed"]);
    }

    #[test]
    fn test_remove_value_deep() {
        let mut c = Collection::new();
        for n in [1, 2, 1, 1] {
            c.push(n);
        }
        assert!(c.remove_value(&1, false));
        assert_eq!(c.len(), 3);
        assert!(c.remove_value(&1, true));
        assert_eq!(values(&c), vec![2]);
        assert!(!c.remove_value(&7, true));
    }
}
