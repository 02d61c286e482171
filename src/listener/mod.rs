//! Typed listener registry.
//!
//! This module provides [`ListenerRegistry`], which keeps listener handles
//! grouped by a category tag. Instead of filtering one flat list by the
//! runtime type of its listeners, callers ask for the listeners of a
//! category directly:
//!
//! ```rust
//! use delegating_keymap::listener::ListenerRegistry;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Category {
//!     Change,
//!     Property,
//! }
//!
//! let mut registry = ListenerRegistry::new();
//! registry.add(Category::Change, 1_u32);
//! registry.add(Category::Property, 2_u32);
//! registry.add(Category::Change, 3_u32);
//!
//! assert_eq!(registry.listeners(&Category::Change), &[1, 3]);
//! assert_eq!(registry.listeners(&Category::Property), &[2]);
//! assert_eq!(registry.len(), 3);
//! ```
//!
//! Listeners are opaque to the registry: it stores, orders and removes
//! them, and never calls them.

use std::collections::HashMap;
use std::hash::Hash;

use smallvec::SmallVec;

use crate::keymap::EntryHasher;

/// Number of listeners per category stored inline before spilling to the heap.
const INLINE_LISTENERS: usize = 4;

type ListenerList<L> = SmallVec<[L; INLINE_LISTENERS]>;

/// A mapping from category tag to an ordered sequence of listener handles.
///
/// The same listener may be registered several times under one category;
/// each registration is kept and reported.
#[derive(Debug, Clone)]
pub struct ListenerRegistry<C, L> {
    categories: HashMap<C, ListenerList<L>, EntryHasher>,
    total: usize,
}

impl<C, L> ListenerRegistry<C, L> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: HashMap::with_hasher(EntryHasher::default()),
            total: 0,
        }
    }

    /// Returns the total number of registrations over all categories.
    #[inline]
    pub const fn len(&self) -> usize {
        self.total
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterates over the categories that currently have listeners.
    pub fn categories(&self) -> impl Iterator<Item = &C> {
        self.categories.keys()
    }

    /// Removes every registration.
    pub fn clear(&mut self) {
        self.categories.clear();
        self.total = 0;
    }
}

impl<C: Eq + Hash, L> ListenerRegistry<C, L> {
    /// Appends `listener` to the listeners of `category`.
    pub fn add(&mut self, category: C, listener: L) {
        self.categories.entry(category).or_default().push(listener);
        self.total += 1;
    }

    /// Returns the listeners of `category` in registration order.
    pub fn listeners(&self, category: &C) -> &[L] {
        self.categories
            .get(category)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the number of listeners registered under `category`.
    pub fn count(&self, category: &C) -> usize {
        self.categories.get(category).map_or(0, SmallVec::len)
    }

    /// Removes every listener of `category`, returning how many there were.
    pub fn clear_category(&mut self, category: &C) -> usize {
        let removed = self.categories.remove(category).map_or(0, |list| list.len());
        self.total -= removed;
        removed
    }
}

impl<C: Eq + Hash, L: PartialEq> ListenerRegistry<C, L> {
    /// Removes the most recent registration of `listener` under `category`.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove(&mut self, category: &C, listener: &L) -> bool {
        let Some(list) = self.categories.get_mut(category) else {
            return false;
        };
        let Some(position) = list.iter().rposition(|registered| registered == listener) else {
            return false;
        };
        list.remove(position);
        if list.is_empty() {
            self.categories.remove(category);
        }
        self.total -= 1;
        true
    }

    /// Returns `true` if `listener` is registered under `category`.
    pub fn contains(&self, category: &C, listener: &L) -> bool {
        self.listeners(category).contains(listener)
    }
}

impl<C, L> Default for ListenerRegistry<C, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Eq + Hash, L> Extend<(C, L)> for ListenerRegistry<C, L> {
    fn extend<I: IntoIterator<Item = (C, L)>>(&mut self, iter: I) {
        for (category, listener) in iter {
            self.add(category, listener);
        }
    }
}

impl<C: Eq + Hash, L> FromIterator<(C, L)> for ListenerRegistry<C, L> {
    fn from_iter<I: IntoIterator<Item = (C, L)>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_is_empty() {
        let registry: ListenerRegistry<&str, u32> = ListenerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.listeners(&"change").is_empty());
        assert_eq!(registry.count(&"change"), 0);
    }

    #[rstest]
    fn test_listeners_keep_registration_order() {
        let registry: ListenerRegistry<&str, u32> =
            [("change", 3), ("change", 1), ("change", 2)].into_iter().collect();
        assert_eq!(registry.listeners(&"change"), &[3, 1, 2]);
    }

    #[rstest]
    fn test_duplicate_registration_is_kept() {
        let mut registry = ListenerRegistry::new();
        registry.add("change", 7_u32);
        registry.add("change", 7_u32);
        assert_eq!(registry.count(&"change"), 2);

        assert!(registry.remove(&"change", &7));
        assert_eq!(registry.count(&"change"), 1);
        assert!(registry.contains(&"change", &7));
    }

    #[rstest]
    fn test_remove_takes_most_recent_registration() {
        let mut registry = ListenerRegistry::new();
        registry.extend([("c", (1, "first")), ("c", (2, "x")), ("c", (1, "first"))]);
        assert!(registry.remove(&"c", &(1, "first")));
        assert_eq!(registry.listeners(&"c"), &[(1, "first"), (2, "x")]);
    }

    #[rstest]
    fn test_remove_unknown_returns_false() {
        let mut registry: ListenerRegistry<&str, u32> = ListenerRegistry::new();
        registry.add("change", 1);
        assert!(!registry.remove(&"change", &2));
        assert!(!registry.remove(&"focus", &1));
        assert_eq!(registry.len(), 1);
    }

    #[rstest]
    fn test_empty_category_is_dropped() {
        let mut registry = ListenerRegistry::new();
        registry.add("change", 1_u32);
        registry.remove(&"change", &1);
        assert_eq!(registry.categories().count(), 0);
        assert!(registry.is_empty());
    }

    #[rstest]
    fn test_clear_category() {
        let mut registry = ListenerRegistry::new();
        registry.extend([("a", 1_u32), ("a", 2), ("b", 3)]);
        assert_eq!(registry.clear_category(&"a"), 2);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.clear_category(&"a"), 0);

        registry.clear();
        assert!(registry.is_empty());
    }
}
