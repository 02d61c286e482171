//! Component-bound maps.
//!
//! A map can be bound to an opaque component identity when it is created
//! with [`KeyMapArena::insert_bound_map`]. The arena does not interpret the
//! component; it only enforces that a bound map delegates either to nothing
//! or to another map bound to the same component.
//!
//! [`KeyMapArena::insert_bound_map`]: super::KeyMapArena::insert_bound_map

use std::fmt;
use std::num::NonZeroU64;

use super::KeyMapError;

/// Opaque, non-null identity of a component a map can be bound to.
///
/// # Examples
///
/// ```rust
/// use delegating_keymap::keymap::{ComponentId, KeyMapError};
///
/// let component = ComponentId::new(42).unwrap();
/// assert_eq!(component.get(), 42);
///
/// assert!(matches!(ComponentId::new(0), Err(KeyMapError::InvalidArgument(_))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ComponentId(NonZeroU64);

impl ComponentId {
    /// Wraps a raw component identity.
    ///
    /// # Errors
    ///
    /// Returns [`KeyMapError::InvalidArgument`] when `raw` is `0`, the null
    /// component.
    pub fn new(raw: u64) -> Result<Self, KeyMapError> {
        NonZeroU64::new(raw)
            .map(Self)
            .ok_or(KeyMapError::InvalidArgument("component must not be null"))
    }

    /// Returns the raw identity.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Component({})", self.0)
    }
}

/// Checks the bound-map parent rule.
///
/// `child` and `parent` are the bindings of the two maps. An unbound child
/// accepts any parent; a bound child only accepts a parent bound to the same
/// component.
pub(super) fn parent_allowed(child: Option<ComponentId>, parent: Option<ComponentId>) -> bool {
    match child {
        None => true,
        Some(component) => parent == Some(component),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_rejects_null() {
        assert_eq!(
            ComponentId::new(0),
            Err(KeyMapError::InvalidArgument("component must not be null"))
        );
    }

    #[rstest]
    fn test_display() {
        assert_eq!(ComponentId::new(9).unwrap().to_string(), "Component(9)");
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(None, Some(1), true)]
    #[case(Some(1), Some(1), true)]
    #[case(Some(1), Some(2), false)]
    #[case(Some(1), None, false)]
    fn test_parent_allowed(
        #[case] child: Option<u64>,
        #[case] parent: Option<u64>,
        #[case] expected: bool,
    ) {
        let child = child.map(|raw| ComponentId::new(raw).unwrap());
        let parent = parent.map(|raw| ComponentId::new(raw).unwrap());
        assert_eq!(parent_allowed(child, parent), expected);
    }
}
