//! A lock-protected arena handle for use across threads.
//!
//! [`KeyMapArena`] has no internal synchronization. [`SharedKeyMapArena`]
//! supplies the external mutual exclusion: clones share one arena behind a
//! `parking_lot::RwLock`, so readers run concurrently and writers are
//! exclusive. Delegated reads see the parent's state at the moment the read
//! lock is taken.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{KeyMapArena, KeyMapError, MapId};

/// Cloneable, thread-safe handle to a [`KeyMapArena`].
///
/// # Examples
///
/// ```rust
/// use delegating_keymap::keymap::SharedKeyMapArena;
///
/// let shared = SharedKeyMapArena::new();
/// let (parent, child) = {
///     let mut arena = shared.write();
///     let parent = arena.insert_map();
///     let child = arena.insert_child(parent).unwrap();
///     (parent, child)
/// };
///
/// shared.put(parent, "paste", Some(3)).unwrap();
/// let reader = shared.clone();
/// let value = std::thread::spawn(move || reader.get_cloned(child, "paste"))
///     .join()
///     .unwrap();
/// assert_eq!(value, Ok(Some(3)));
/// ```
pub struct SharedKeyMapArena<K, V> {
    inner: Arc<RwLock<KeyMapArena<K, V>>>,
}

impl<K, V> SharedKeyMapArena<K, V> {
    /// Creates a handle to a new, empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::from_arena(KeyMapArena::new())
    }

    /// Wraps an existing arena.
    #[must_use]
    pub fn from_arena(arena: KeyMapArena<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(arena)),
        }
    }

    /// Locks the arena for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, KeyMapArena<K, V>> {
        self.inner.read()
    }

    /// Locks the arena for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, KeyMapArena<K, V>> {
        self.inner.write()
    }

    /// Replaces the delegation target of a map under the write lock.
    ///
    /// # Errors
    ///
    /// See [`KeyMapArena::set_parent`].
    pub fn set_parent(&self, id: MapId, parent: Option<MapId>) -> Result<(), KeyMapError> {
        self.inner.write().set_parent(id, parent)
    }

    /// Returns `true` if both handles share the same arena.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<K: Eq + Hash, V> SharedKeyMapArena<K, V> {
    /// Stores or removes a local entry under the write lock.
    ///
    /// # Errors
    ///
    /// See [`KeyMapArena::put`].
    pub fn put(&self, id: MapId, key: K, value: Option<V>) -> Result<Option<V>, KeyMapError> {
        self.inner.write().put(id, key, value)
    }

    /// Looks `key` up through the delegation chain under the read lock and
    /// clones the result out of the lock.
    ///
    /// # Errors
    ///
    /// See [`KeyMapArena::get`].
    pub fn get_cloned<Q>(&self, id: MapId, key: &Q) -> Result<Option<V>, KeyMapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        Ok(self.inner.read().get(id, key)?.cloned())
    }
}

impl<K, V> Clone for SharedKeyMapArena<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for SharedKeyMapArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<KeyMapArena<K, V>> for SharedKeyMapArena<K, V> {
    fn from(arena: KeyMapArena<K, V>) -> Self {
        Self::from_arena(arena)
    }
}

static_assertions::assert_impl_all!(SharedKeyMapArena<String, i32>: Send, Sync, Clone);
