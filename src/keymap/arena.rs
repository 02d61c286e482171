//! Arena of delegating key maps.
//!
//! This module provides [`KeyMapArena`], which owns a set of key maps and
//! the parent links between them.
//!
//! # Overview
//!
//! Every map is addressed by a [`MapId`] handle. A handle stays valid until
//! its map is removed; afterwards the slot may be reused under a new
//! generation and the old handle is reported as [`KeyMapError::UnknownMap`].
//!
//! | Operation       | Complexity                  |
//! |-----------------|-----------------------------|
//! | `insert_map`    | O(1) amortized              |
//! | `put`/`remove`  | O(1) average                |
//! | `get`           | O(d), d = delegation depth  |
//! | `keys`/`size`   | O(n) / O(1), local only     |
//! | `all_keys`      | O(total keys along chain)   |
//! | `set_parent`    | O(d) cycle check            |
//! | `remove_map`    | O(m), m = number of slots   |
//!
//! The parent graph is kept acyclic by [`KeyMapArena::set_parent`], so
//! delegation always terminates at a map without parent.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use super::binding::{self, ComponentId};
use super::{EntryHasher, KeyMapError, LocalEntries};

// =============================================================================
// MapId
// =============================================================================

/// Handle naming one map inside a [`KeyMapArena`].
///
/// Handles are cheap to copy and compare. They carry a generation so that a
/// handle to a removed map is never confused with a map that later reuses
/// the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapId {
    index: u32,
    generation: u32,
}

impl MapId {
    #[inline]
    pub(crate) const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index of this handle.
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation of this handle.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "MapId({}v{})", self.index, self.generation)
    }
}

// =============================================================================
// Node and Slot
// =============================================================================

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize + Eq + Hash, V: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de> + Eq + Hash, V: serde::Deserialize<'de>"
    ))
)]
pub(super) struct Node<K, V> {
    pub(super) entries: LocalEntries<K, V>,
    pub(super) parent: Option<MapId>,
    pub(super) binding: Option<ComponentId>,
    pub(super) sealed: bool,
}

impl<K, V> Node<K, V> {
    fn new(binding: Option<ComponentId>) -> Self {
        Self {
            entries: LocalEntries::new(),
            parent: None,
            binding,
            sealed: false,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize + Eq + Hash, V: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de> + Eq + Hash, V: serde::Deserialize<'de>"
    ))
)]
pub(super) struct Slot<K, V> {
    pub(super) generation: u32,
    pub(super) node: Option<Node<K, V>>,
}

// =============================================================================
// KeyMapArena Definition
// =============================================================================

/// An arena of key maps with single-parent delegation.
///
/// # Examples
///
/// ```rust
/// use delegating_keymap::keymap::KeyMapArena;
///
/// let mut arena = KeyMapArena::new();
/// let parent = arena.insert_map();
/// let child = arena.insert_child(parent).unwrap();
///
/// for key in ["a", "b", "c", "d"] {
///     arena.insert(parent, key, 0).unwrap();
/// }
/// for key in ["c", "d", "e", "f"] {
///     arena.insert(child, key, 1).unwrap();
/// }
///
/// assert_eq!(arena.keys(child).unwrap().len(), 4);
/// assert_eq!(arena.all_keys(child).unwrap().len(), 6);
/// assert_eq!(arena.get(child, "a").unwrap(), Some(&0));
/// assert_eq!(arena.get(child, "c").unwrap(), Some(&1));
/// ```
#[derive(Clone)]
pub struct KeyMapArena<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<u32>,
    live: usize,
    empty_root: Option<MapId>,
}

impl<K, V> KeyMapArena<K, V> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            empty_root: None,
        }
    }

    /// Returns the number of live maps.
    #[inline]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the arena holds no maps.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns `true` if `id` names a live map of this arena.
    pub fn contains_map(&self, id: MapId) -> bool {
        self.node(id).is_ok()
    }

    /// Iterates over the handles of all live maps, in slot order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn map_ids(&self) -> impl Iterator<Item = MapId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .map(|_| MapId::from_raw_parts(index as u32, slot.generation))
        })
    }

    /// Creates an empty map without parent.
    pub fn insert_map(&mut self) -> MapId {
        self.allocate(Node::new(None))
    }

    /// Creates an empty map bound to `component`.
    ///
    /// A bound map may only delegate to maps bound to the same component.
    pub fn insert_bound_map(&mut self, component: ComponentId) -> MapId {
        self.allocate(Node::new(Some(component)))
    }

    /// Creates an empty map delegating to `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `parent` is not live.
    pub fn insert_child(&mut self, parent: MapId) -> Result<MapId, KeyMapError> {
        self.node(parent)?;
        let mut node = Node::new(None);
        node.parent = Some(parent);
        Ok(self.allocate(node))
    }

    /// Returns the shared, sealed, empty map of this arena.
    ///
    /// The map is created on the first call and the same handle is returned
    /// afterwards. It is the natural parent for maps that should delegate to
    /// "nothing" explicitly.
    pub fn empty_root(&mut self) -> MapId {
        if let Some(id) = self.empty_root {
            return id;
        }
        let mut node = Node::new(None);
        node.sealed = true;
        let id = self.allocate(node);
        self.empty_root = Some(id);
        id
    }

    /// Seals a map. Sealed maps can be read and delegated to, but never
    /// mutated, re-parented or removed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn seal(&mut self, id: MapId) -> Result<(), KeyMapError> {
        self.node_mut(id)?.sealed = true;
        Ok(())
    }

    /// Returns `true` if the map is sealed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn is_sealed(&self, id: MapId) -> Result<bool, KeyMapError> {
        Ok(self.node(id)?.sealed)
    }

    /// Returns the component the map is bound to, if any.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn component(&self, id: MapId) -> Result<Option<ComponentId>, KeyMapError> {
        Ok(self.node(id)?.binding)
    }

    /// Returns the delegation target of the map.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn parent(&self, id: MapId) -> Result<Option<MapId>, KeyMapError> {
        Ok(self.node(id)?.parent)
    }

    /// Replaces the delegation target of the map.
    ///
    /// Passing `None` makes the map a root.
    ///
    /// # Errors
    ///
    /// - [`KeyMapError::UnknownMap`] if `id` or `parent` is not live.
    /// - [`KeyMapError::Sealed`] if the map is sealed.
    /// - [`KeyMapError::CyclicReference`] if `parent` is the map itself or
    ///   one of its descendants.
    /// - [`KeyMapError::ComponentMismatch`] if the map is bound and `parent`
    ///   is not bound to the same component.
    pub fn set_parent(&mut self, id: MapId, parent: Option<MapId>) -> Result<(), KeyMapError> {
        let node = self.node(id)?;
        if node.sealed {
            return Err(KeyMapError::Sealed(id));
        }
        let binding = node.binding;

        if let Some(parent_id) = parent {
            let parent_node = self.node(parent_id)?;
            if self.chain_ids(parent_id).any(|ancestor| ancestor == id) {
                tracing::warn!(map = %id, parent = %parent_id, "rejected cyclic parent");
                return Err(KeyMapError::CyclicReference {
                    map: id,
                    parent: parent_id,
                });
            }
            if !binding::parent_allowed(binding, parent_node.binding) {
                tracing::warn!(map = %id, parent = %parent_id, "rejected parent bound to another component");
                return Err(KeyMapError::ComponentMismatch {
                    map: id,
                    parent: parent_id,
                });
            }
        }

        self.node_mut(id)?.parent = parent;
        tracing::debug!(map = %id, parent = ?parent, "parent changed");
        Ok(())
    }

    /// Removes a map from the arena and returns its local entries.
    ///
    /// Maps that delegated to the removed map are detached and become roots.
    ///
    /// # Errors
    ///
    /// - [`KeyMapError::UnknownMap`] if `id` is not live.
    /// - [`KeyMapError::Sealed`] if the map is sealed, or if a sealed map
    ///   delegates to it (sealed maps are never re-parented).
    pub fn remove_map(&mut self, id: MapId) -> Result<LocalEntries<K, V>, KeyMapError> {
        if self.node(id)?.sealed {
            return Err(KeyMapError::Sealed(id));
        }
        if let Some(child) = self.map_ids().find(|child| {
            self.node(*child)
                .is_ok_and(|node| node.sealed && node.parent == Some(id))
        }) {
            return Err(KeyMapError::Sealed(child));
        }

        let slot = &mut self.slots[id.index as usize];
        let node = slot.node.take().ok_or(KeyMapError::UnknownMap(id))?;
        // A slot whose generation is exhausted is retired instead of reused.
        if slot.generation == u32::MAX {
            tracing::trace!(map = %id, "retired slot with exhausted generation");
        } else {
            slot.generation += 1;
            self.free.push(id.index);
        }
        self.live -= 1;

        let mut detached = 0_usize;
        for other in self.slots.iter_mut().filter_map(|slot| slot.node.as_mut()) {
            if other.parent == Some(id) {
                other.parent = None;
                detached += 1;
            }
        }
        if detached > 0 {
            tracing::trace!(map = %id, detached, "detached children of removed map");
        }
        tracing::debug!(map = %id, entries = node.entries.len(), "map removed");

        Ok(node.entries)
    }

    /// Copies the map and its ancestors into a fresh arena.
    ///
    /// Returns the new arena and the handle of the copied map in it. Entries,
    /// bindings and seal flags are copied; maps outside the chain are not.
    /// This is how a single map is persisted together with its parent chain.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn extract_chain(&self, id: MapId) -> Result<(Self, MapId), KeyMapError>
    where
        K: Clone,
        V: Clone,
    {
        self.node(id)?;
        let chain: Vec<MapId> = self.chain_ids(id).collect();

        let mut extracted = Self::new();
        let mut parent = None;
        for source in chain.into_iter().rev() {
            let mut node = self.node(source)?.clone();
            node.parent = parent;
            let copied = extracted.allocate(node);
            if self.empty_root == Some(source) {
                extracted.empty_root = Some(copied);
            }
            parent = Some(copied);
        }

        parent
            .map(|leaf| (extracted, leaf))
            .ok_or(KeyMapError::UnknownMap(id))
    }

    /// Returns a read view of the map.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn map(&self, id: MapId) -> Result<KeyMapRef<'_, K, V>, KeyMapError> {
        let node = self.node(id)?;
        Ok(KeyMapRef {
            arena: self,
            id,
            node,
        })
    }

    /// Returns a write view of the map.
    ///
    /// # Errors
    ///
    /// - [`KeyMapError::UnknownMap`] if `id` is not live.
    /// - [`KeyMapError::Sealed`] if the map is sealed.
    pub fn map_mut(&mut self, id: MapId) -> Result<KeyMapMut<'_, K, V>, KeyMapError> {
        let node = self.unsealed_node_mut(id)?;
        Ok(KeyMapMut { id, node })
    }

    /// Iterates over the ancestors of the map, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn ancestors(&self, id: MapId) -> Result<Ancestors<'_, K, V>, KeyMapError> {
        Ok(Ancestors {
            arena: self,
            next: self.node(id)?.parent,
        })
    }

    /// Returns the number of ancestors of the map.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn depth(&self, id: MapId) -> Result<usize, KeyMapError> {
        Ok(self.ancestors(id)?.count())
    }

    /// Returns the number of local entries of the map.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn size(&self, id: MapId) -> Result<usize, KeyMapError> {
        Ok(self.node(id)?.entries.len())
    }

    /// Returns the local keys of the map. Ancestor keys are not included.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn keys(&self, id: MapId) -> Result<Vec<&K>, KeyMapError> {
        Ok(self.node(id)?.entries.keys().collect())
    }

    /// Removes all local entries of the map. Ancestors are unaffected.
    ///
    /// # Errors
    ///
    /// - [`KeyMapError::UnknownMap`] if `id` is not live.
    /// - [`KeyMapError::Sealed`] if the map is sealed.
    pub fn clear(&mut self, id: MapId) -> Result<(), KeyMapError> {
        self.unsealed_node_mut(id)?.entries.clear();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    #[allow(clippy::cast_possible_truncation)]
    fn allocate(&mut self, node: Node<K, V>) -> MapId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return MapId::from_raw_parts(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        MapId::from_raw_parts(index, 0)
    }

    fn node(&self, id: MapId) -> Result<&Node<K, V>, KeyMapError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(KeyMapError::UnknownMap(id))
    }

    fn node_mut(&mut self, id: MapId) -> Result<&mut Node<K, V>, KeyMapError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(KeyMapError::UnknownMap(id))
    }

    fn unsealed_node_mut(&mut self, id: MapId) -> Result<&mut Node<K, V>, KeyMapError> {
        let node = self.node_mut(id)?;
        if node.sealed {
            return Err(KeyMapError::Sealed(id));
        }
        Ok(node)
    }

    /// Iterates over `start` and its ancestors.
    fn chain_ids(&self, start: MapId) -> impl Iterator<Item = MapId> + '_ {
        std::iter::successors(Some(start), |id| {
            self.node(*id).ok().and_then(|node| node.parent)
        })
    }

    /// Rebuilds an arena from its persisted slots, validating the parent graph.
    #[cfg(feature = "serde")]
    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn from_parts(
        slots: Vec<Slot<K, V>>,
        empty_root: Option<MapId>,
    ) -> Result<Self, KeyMapError> {
        let mut free = Vec::new();
        let mut live = 0;
        for (index, slot) in slots.iter().enumerate() {
            if slot.node.is_some() {
                live += 1;
            } else if slot.generation != u32::MAX {
                free.push(index as u32);
            }
        }
        // Lowest free index is reused first.
        free.reverse();

        let arena = Self {
            slots,
            free,
            live,
            empty_root,
        };

        if let Some(root) = empty_root {
            let node = arena.node(root)?;
            if !(node.sealed && node.entries.is_empty() && node.parent.is_none()) {
                return Err(KeyMapError::InvalidArgument(
                    "empty root must be sealed, empty and parentless",
                ));
            }
        }
        for id in arena.map_ids() {
            let node = arena.node(id)?;
            let Some(parent) = node.parent else {
                continue;
            };
            let parent_node = arena.node(parent)?;
            if !binding::parent_allowed(node.binding, parent_node.binding) {
                return Err(KeyMapError::ComponentMismatch { map: id, parent });
            }
            if arena.chain_ids(parent).take(arena.live + 1).any(|ancestor| ancestor == id) {
                return Err(KeyMapError::CyclicReference { map: id, parent });
            }
        }

        Ok(arena)
    }

    #[cfg(feature = "serde")]
    pub(super) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    #[cfg(feature = "serde")]
    pub(super) const fn persisted_empty_root(&self) -> Option<MapId> {
        self.empty_root
    }
}

impl<K: Eq + Hash, V> KeyMapArena<K, V> {
    /// Stores `value` under `key` in the map, or removes `key` locally when
    /// `value` is `None`.
    ///
    /// Returns the previous local value. Ancestors are never touched.
    ///
    /// # Errors
    ///
    /// - [`KeyMapError::UnknownMap`] if `id` is not live.
    /// - [`KeyMapError::Sealed`] if the map is sealed.
    pub fn put(&mut self, id: MapId, key: K, value: Option<V>) -> Result<Option<V>, KeyMapError> {
        Ok(self.unsealed_node_mut(id)?.entries.put(key, value))
    }

    /// Stores `value` under `key` in the map.
    ///
    /// # Errors
    ///
    /// See [`KeyMapArena::put`].
    pub fn insert(&mut self, id: MapId, key: K, value: V) -> Result<Option<V>, KeyMapError> {
        self.put(id, key, Some(value))
    }

    /// Removes `key` from the map's local entries.
    ///
    /// An ancestor's entry for the same key becomes visible again.
    ///
    /// # Errors
    ///
    /// - [`KeyMapError::UnknownMap`] if `id` is not live.
    /// - [`KeyMapError::Sealed`] if the map is sealed.
    pub fn remove<Q>(&mut self, id: MapId, key: &Q) -> Result<Option<V>, KeyMapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Ok(self.unsealed_node_mut(id)?.entries.remove(key))
    }

    /// Looks `key` up in the map, then in its ancestors, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn get<Q>(&self, id: MapId, key: &Q) -> Result<Option<&V>, KeyMapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Ok(self.map(id)?.get(key))
    }

    /// Returns `true` if `key` resolves in the map or one of its ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn contains_key<Q>(&self, id: MapId, key: &Q) -> Result<bool, KeyMapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        Ok(self.map(id)?.contains_key(key))
    }

    /// Returns the union of the map's local keys and all ancestor keys,
    /// each key reported once.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn all_keys(&self, id: MapId) -> Result<Vec<&K>, KeyMapError> {
        Ok(self.map(id)?.all_keys())
    }

    /// Returns every key visible from the map with the value [`get`] would
    /// return for it.
    ///
    /// [`get`]: KeyMapArena::get
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::UnknownMap`] if `id` is not live.
    pub fn resolved_entries(&self, id: MapId) -> Result<Vec<(&K, &V)>, KeyMapError> {
        Ok(self.map(id)?.resolved_entries())
    }
}

impl<K, V> Default for KeyMapArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyMapArena<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.map_ids().filter_map(|id| Some((id, self.node(id).ok()?))))
            .finish()
    }
}

// =============================================================================
// KeyMapRef
// =============================================================================

/// Read view of one map of a [`KeyMapArena`].
pub struct KeyMapRef<'arena, K, V> {
    arena: &'arena KeyMapArena<K, V>,
    id: MapId,
    node: &'arena Node<K, V>,
}

impl<K, V> Clone for KeyMapRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for KeyMapRef<'_, K, V> {}

impl<'arena, K, V> KeyMapRef<'arena, K, V> {
    /// Returns the handle of this map.
    pub const fn id(&self) -> MapId {
        self.id
    }

    /// Returns the delegation target.
    pub const fn parent(&self) -> Option<MapId> {
        self.node.parent
    }

    /// Returns the component this map is bound to.
    pub const fn component(&self) -> Option<ComponentId> {
        self.node.binding
    }

    /// Returns `true` if this map is sealed.
    pub const fn is_sealed(&self) -> bool {
        self.node.sealed
    }

    /// Returns the number of local entries.
    pub fn size(&self) -> usize {
        self.node.entries.len()
    }

    /// Returns `true` if there are no local entries.
    pub fn is_empty(&self) -> bool {
        self.node.entries.is_empty()
    }

    /// Returns the local keys.
    pub fn keys(&self) -> Vec<&'arena K> {
        self.node.entries.keys().collect()
    }

    /// Returns the local entries.
    pub const fn local_entries(&self) -> &'arena LocalEntries<K, V> {
        &self.node.entries
    }

    /// Iterates over the ancestors of this map, nearest first.
    pub const fn ancestors(&self) -> Ancestors<'arena, K, V> {
        Ancestors {
            arena: self.arena,
            next: self.node.parent,
        }
    }

    fn chain(&self) -> impl Iterator<Item = KeyMapRef<'arena, K, V>> {
        std::iter::once(*self).chain(self.ancestors())
    }
}

impl<'arena, K: Eq + Hash, V> KeyMapRef<'arena, K, V> {
    /// Returns the local value for `key`, ignoring ancestors.
    pub fn get_local<Q>(&self, key: &Q) -> Option<&'arena V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node.entries.get(key)
    }

    /// Returns `true` if `key` is stored locally.
    pub fn contains_local_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node.entries.contains_key(key)
    }

    /// Looks `key` up locally, then in the ancestors, nearest first.
    pub fn get<Q>(&self, key: &Q) -> Option<&'arena V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.chain().find_map(|map| map.get_local(key))
    }

    /// Returns `true` if `key` resolves here or in an ancestor.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.chain().any(|map| map.contains_local_key(key))
    }

    /// Returns local and ancestor keys, each key once.
    pub fn all_keys(&self) -> Vec<&'arena K> {
        let mut seen = HashSet::with_hasher(EntryHasher::default());
        self.chain()
            .flat_map(|map| map.node.entries.keys())
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Returns every visible key with its nearest definition.
    pub fn resolved_entries(&self) -> Vec<(&'arena K, &'arena V)> {
        let mut seen = HashSet::with_hasher(EntryHasher::default());
        self.chain()
            .flat_map(|map| map.node.entries.iter())
            .filter(|(key, _)| seen.insert(*key))
            .collect()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyMapRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("KeyMapRef")
            .field("id", &self.id)
            .field("parent", &self.node.parent)
            .field("entries", &self.node.entries)
            .finish()
    }
}

// =============================================================================
// KeyMapMut
// =============================================================================

/// Write view of one unsealed map of a [`KeyMapArena`].
///
/// Every mutation is local to this map.
pub struct KeyMapMut<'arena, K, V> {
    id: MapId,
    node: &'arena mut Node<K, V>,
}

impl<K, V> KeyMapMut<'_, K, V> {
    /// Returns the handle of this map.
    pub const fn id(&self) -> MapId {
        self.id
    }

    /// Returns the delegation target.
    pub const fn parent(&self) -> Option<MapId> {
        self.node.parent
    }

    /// Returns the number of local entries.
    pub fn size(&self) -> usize {
        self.node.entries.len()
    }

    /// Returns `true` if there are no local entries.
    pub fn is_empty(&self) -> bool {
        self.node.entries.is_empty()
    }

    /// Removes all local entries.
    pub fn clear(&mut self) {
        self.node.entries.clear();
    }
}

impl<K: Eq + Hash, V> KeyMapMut<'_, K, V> {
    /// Stores `value` under `key`, or removes `key` when `value` is `None`.
    pub fn put(&mut self, key: K, value: Option<V>) -> Option<V> {
        self.node.entries.put(key, value)
    }

    /// Stores `value` under `key`.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.node.entries.put(key, Some(value))
    }

    /// Removes `key` from the local entries.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node.entries.remove(key)
    }

    /// Returns the local value for `key`.
    pub fn get_local<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node.entries.get(key)
    }

    /// Returns a mutable reference to the local value for `key`.
    pub fn get_local_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node.entries.get_mut(key)
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for KeyMapMut<'_, K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.node.entries.extend(iter);
    }
}

// =============================================================================
// Ancestors
// =============================================================================

/// Iterator over the ancestors of a map, nearest first.
///
/// Created by [`KeyMapArena::ancestors`] and [`KeyMapRef::ancestors`].
pub struct Ancestors<'arena, K, V> {
    arena: &'arena KeyMapArena<K, V>,
    next: Option<MapId>,
}

impl<'arena, K, V> Iterator for Ancestors<'arena, K, V> {
    type Item = KeyMapRef<'arena, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.arena.node(id).ok()?;
        self.next = node.parent;
        Some(KeyMapRef {
            arena: self.arena,
            id,
            node,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
