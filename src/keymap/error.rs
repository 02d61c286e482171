//! Error types for key map arenas.
//!
//! Ordinary misses are never errors: looking up an absent key, removing an
//! absent key and having no parent all succeed. The errors below cover stale
//! handles and structural rules of the parent graph.

use std::fmt;

use super::MapId;

/// Represents errors that can occur when operating on a [`KeyMapArena`].
///
/// [`KeyMapArena`]: super::KeyMapArena
///
/// # Examples
///
/// ```rust
/// use delegating_keymap::keymap::{KeyMapArena, KeyMapError};
///
/// let mut arena: KeyMapArena<&str, i32> = KeyMapArena::new();
/// let map = arena.insert_map();
///
/// let error = arena.set_parent(map, Some(map)).unwrap_err();
/// assert!(matches!(error, KeyMapError::CyclicReference { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMapError {
    /// The handle does not name a live map in this arena.
    UnknownMap(MapId),
    /// Setting `parent` as the parent of `map` would close a delegation cycle.
    CyclicReference {
        /// The map whose parent was being set.
        map: MapId,
        /// The rejected parent.
        parent: MapId,
    },
    /// The map is sealed and cannot be mutated or removed.
    Sealed(MapId),
    /// A component-bound map may only delegate to a map bound to the same component.
    ComponentMismatch {
        /// The bound map whose parent was being set.
        map: MapId,
        /// The rejected parent.
        parent: MapId,
    },
    /// An argument was outside the accepted domain.
    InvalidArgument(&'static str),
}

impl fmt::Display for KeyMapError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMap(map) => write!(formatter, "unknown map {map}"),
            Self::CyclicReference { map, parent } => write!(
                formatter,
                "setting {parent} as parent of {map} would create a delegation cycle"
            ),
            Self::Sealed(map) => write!(formatter, "map {map} is sealed"),
            Self::ComponentMismatch { map, parent } => write!(
                formatter,
                "map {parent} is not bound to the same component as {map}"
            ),
            Self::InvalidArgument(message) => write!(formatter, "invalid argument: {message}"),
        }
    }
}

impl std::error::Error for KeyMapError {}
