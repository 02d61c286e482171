//! # delegating-keymap
//!
//! Hierarchical key maps with parent delegation.
//!
//! ## Overview
//!
//! A delegating key map stores its own *local entries* and may name a
//! *parent* map. Lookups that miss locally fall back to the parent,
//! recursively; mutations never leave the map they target. The same
//! structure underlies action/input maps in UI toolkits, prototype-chain
//! lookup and cascading configuration.
//!
//! - **Key Maps**: [`keymap::KeyMapArena`] owns the maps and validates every
//!   parent link, so delegation chains are always acyclic
//! - **Component Binding**: maps bound to an opaque component may only
//!   delegate to maps bound to the same component
//! - **Listener Registry**: [`listener::ListenerRegistry`] groups opaque
//!   listener handles by category
//!
//! ## Feature Flags
//!
//! - `listener`: Listener registry (enabled by default)
//! - `serde`: Serialization of whole arenas
//! - `sync`: `SharedKeyMapArena`, a lock-protected handle for threads
//! - `fxhash`: Hash local entries with `rustc-hash`
//! - `ahash`: Hash local entries with `ahash`
//! - `full`: Enable `listener`, `serde` and `sync`
//!
//! ## Example
//!
//! ```rust
//! use delegating_keymap::prelude::*;
//!
//! let mut arena = KeyMapArena::new();
//! let defaults = arena.insert_map();
//! let editor = arena.insert_child(defaults).unwrap();
//!
//! arena.insert(defaults, "ctrl+c", "copy").unwrap();
//! arena.insert(editor, "ctrl+s", "save").unwrap();
//!
//! assert_eq!(arena.get(editor, "ctrl+c").unwrap(), Some(&"copy"));
//! assert_eq!(arena.size(editor).unwrap(), 1);
//! assert_eq!(arena.all_keys(editor).unwrap().len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use delegating_keymap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::keymap::*;

    #[cfg(feature = "listener")]
    pub use crate::listener::*;
}

pub mod keymap;

#[cfg(feature = "listener")]
pub mod listener;
