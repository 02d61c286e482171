//! The local entry set of a single key map.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::hash::Hash;

use super::EntryHasher;

/// The entries stored directly in one map, as opposed to those only visible
/// through an ancestor.
///
/// Keys are unique and iteration order is unspecified.
///
/// # Examples
///
/// ```rust
/// use delegating_keymap::keymap::LocalEntries;
///
/// let mut entries = LocalEntries::new();
/// entries.put("a", Some(1));
/// entries.put("b", Some(2));
/// assert_eq!(entries.len(), 2);
///
/// // Putting `None` removes the key
/// entries.put("a", None);
/// assert_eq!(entries.get("a"), None);
/// assert_eq!(entries.len(), 1);
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize + Eq + Hash, V: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de> + Eq + Hash, V: serde::Deserialize<'de>"
    ))
)]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LocalEntries<K, V> {
    entries: HashMap<K, V, EntryHasher>,
}

impl<K, V> LocalEntries<K, V> {
    /// Creates an empty entry set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(EntryHasher::default()),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> hash_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }
}

impl<K: Eq + Hash, V> LocalEntries<K, V> {
    /// Stores `value` under `key`, or removes `key` when `value` is `None`.
    ///
    /// Returns the value previously stored under `key`, if any. Removing an
    /// absent key is a no-op.
    pub fn put(&mut self, key: K, value: Option<V>) -> Option<V> {
        match value {
            Some(value) => self.entries.insert(key, value),
            None => self.entries.remove(&key),
        }
    }

    /// Returns the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(key)
    }

    /// Removes `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key)
    }

    /// Returns `true` if `key` is stored here.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }
}

impl<K, V> Default for LocalEntries<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LocalEntries<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for LocalEntries<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq + Hash, V: Eq> Eq for LocalEntries<K, V> {}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for LocalEntries<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries = Self::new();
        entries.extend(iter);
        entries
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for LocalEntries<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a, K, V> IntoIterator for &'a LocalEntries<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> IntoIterator for LocalEntries<K, V> {
    type Item = (K, V);
    type IntoIter = hash_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_is_empty() {
        let entries: LocalEntries<String, i32> = LocalEntries::new();
        assert!(entries.is_empty());
        assert_eq!(entries.len(), 0);
    }

    #[rstest]
    fn test_put_some_inserts_and_returns_previous() {
        let mut entries = LocalEntries::new();
        assert_eq!(entries.put("key", Some(1)), None);
        assert_eq!(entries.put("key", Some(2)), Some(1));
        assert_eq!(entries.get("key"), Some(&2));
        assert_eq!(entries.len(), 1);
    }

    #[rstest]
    fn test_put_none_removes_present_key() {
        let mut entries: LocalEntries<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(entries.put("a", None), Some(1));
        assert_eq!(entries.len(), 1);
        assert!(!entries.contains_key("a"));
    }

    #[rstest]
    fn test_put_none_on_absent_key_is_noop() {
        let mut entries: LocalEntries<&str, i32> = [("a", 1)].into_iter().collect();
        assert_eq!(entries.put("missing", None), None);
        assert_eq!(entries.len(), 1);
    }

    #[rstest]
    fn test_borrowed_lookup() {
        let mut entries = LocalEntries::new();
        entries.put("owned".to_string(), Some(7));
        assert_eq!(entries.get("owned"), Some(&7));
        if let Some(value) = entries.get_mut("owned") {
            *value += 1;
        }
        assert_eq!(entries.remove("owned"), Some(8));
    }

    #[rstest]
    fn test_clear() {
        let mut entries: LocalEntries<i32, i32> = (0..10).map(|index| (index, index)).collect();
        entries.clear();
        assert!(entries.is_empty());
    }

    #[rstest]
    fn test_equality_ignores_insertion_order() {
        let first: LocalEntries<i32, &str> = [(1, "one"), (2, "two")].into_iter().collect();
        let second: LocalEntries<i32, &str> = [(2, "two"), (1, "one")].into_iter().collect();
        assert_eq!(first, second);
    }
}
