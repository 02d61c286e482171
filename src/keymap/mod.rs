//! Hierarchical key maps with parent delegation.
//!
//! This module provides [`KeyMapArena`], an arena that owns any number of
//! key maps. Each map holds its own *local entries* and may name one other
//! map of the same arena as its *parent*:
//!
//! - A lookup that misses locally is forwarded to the parent, recursively.
//! - Mutations only ever touch the local entries of the map they target.
//! - A local entry *shadows* the parent's entry for the same key without
//!   removing it; removing the local entry reveals the parent's again.
//!
//! Parent links are [`MapId`] handles rather than references, and
//! [`KeyMapArena::set_parent`] refuses links that would close a cycle, so
//! every delegation chain terminates.
//!
//! # Examples
//!
//! ```rust
//! use delegating_keymap::keymap::KeyMapArena;
//!
//! let mut arena = KeyMapArena::new();
//! let parent = arena.insert_map();
//! let child = arena.insert_map();
//! arena.set_parent(child, Some(parent)).unwrap();
//!
//! arena.insert(parent, "copy", "parent-copy").unwrap();
//! assert_eq!(arena.get(child, "copy").unwrap(), Some(&"parent-copy"));
//!
//! // Shadowing
//! arena.insert(child, "copy", "child-copy").unwrap();
//! assert_eq!(arena.get(child, "copy").unwrap(), Some(&"child-copy"));
//! assert_eq!(arena.get(parent, "copy").unwrap(), Some(&"parent-copy"));
//!
//! // Removing the local entry reveals the parent's again
//! arena.remove(child, "copy").unwrap();
//! assert_eq!(arena.get(child, "copy").unwrap(), Some(&"parent-copy"));
//! ```
//!
//! # Hashing
//!
//! Local entries are stored in a hash map whose hasher is picked at compile
//! time: `FxBuildHasher` with the `fxhash` feature, `ahash::RandomState`
//! with the `ahash` feature, and the standard `RandomState` otherwise.

// =============================================================================
// Hasher Selection
// =============================================================================

/// Hasher used for local entries.
#[cfg(feature = "fxhash")]
pub type EntryHasher = rustc_hash::FxBuildHasher;

/// Hasher used for local entries.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type EntryHasher = ahash::RandomState;

/// Hasher used for local entries.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type EntryHasher = std::collections::hash_map::RandomState;

mod arena;
mod binding;
mod error;
mod local;
#[cfg(feature = "serde")]
mod serde_support;
#[cfg(feature = "sync")]
mod shared;

pub use arena::Ancestors;
pub use arena::KeyMapArena;
pub use arena::KeyMapMut;
pub use arena::KeyMapRef;
pub use arena::MapId;
pub use binding::ComponentId;
pub use error::KeyMapError;
pub use local::LocalEntries;
#[cfg(feature = "sync")]
pub use shared::SharedKeyMapArena;

static_assertions::assert_impl_all!(MapId: Copy, Send, Sync);
static_assertions::assert_impl_all!(ComponentId: Copy, Send, Sync);
static_assertions::assert_impl_all!(KeyMapArena<String, i32>: Send, Sync);
static_assertions::assert_impl_all!(KeyMapError: std::error::Error, Send, Sync);
