//! Common ID Types
//!
//! Type-safe wrappers around store-assigned integer identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Generic typed ID wrapper
///
/// IDs are assigned by the store on insert (auto-increment / sequence),
/// so there is no `new()`; an ID only ever comes from a persisted row.
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
/// let id = UserId::from_i64(7);
/// assert_eq!(id.as_i64(), 7);
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    value: i64,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap a raw store value
    pub const fn from_i64(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the raw store value
    pub const fn as_i64(&self) -> i64 {
        self.value
    }
}

// Manual impls so the marker type does not need to implement anything.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for User IDs
    pub struct User;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_i64() {
        let id = UserId::from_i64(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn test_id_ordering() {
        let a = UserId::from_i64(1);
        let b = UserId::from_i64(2);
        assert!(a < b);
        assert_eq!(a, UserId::from(1));
    }

    #[test]
    fn test_id_serializes_as_number() {
        let id = UserId::from_i64(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
    }
}
