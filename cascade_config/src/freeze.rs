//! Immutable configuration values.
//!
//! A frozen value owns its whole tree behind an [`Arc`] and only ever hands
//! out shared references, so neither the root nor any nested node can be
//! written after freezing.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// A configuration value that can no longer be mutated.
///
/// Clones share the same tree.
#[derive(Clone, PartialEq)]
pub struct FrozenValue(Arc<Value>);

impl FrozenValue {
    /// Borrow the frozen tree.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Produce an independent, mutable copy of the frozen tree.
    #[must_use]
    pub fn thaw(&self) -> Value {
        Value::clone(&self.0)
    }

    /// Take the tree back, cloning it only when other handles still share it.
    #[must_use]
    pub fn into_value(self) -> Value {
        Arc::try_unwrap(self.0).unwrap_or_else(|shared| Value::clone(&shared))
    }

    /// Returns `true` when both handles point at the same frozen tree.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for FrozenValue {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Value> for FrozenValue {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}

impl fmt::Debug for FrozenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FrozenValue").field(&*self.0).finish()
    }
}

impl Serialize for FrozenValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Conversion into a [`FrozenValue`].
///
/// Freezing is idempotent: freezing an already frozen value returns it
/// unchanged.
pub trait Freeze {
    /// Freeze `self` and every node reachable from it.
    fn deep_freeze(self) -> FrozenValue;
}

impl Freeze for Value {
    fn deep_freeze(self) -> FrozenValue {
        FrozenValue(Arc::new(self))
    }
}

impl Freeze for FrozenValue {
    fn deep_freeze(self) -> FrozenValue {
        self
    }
}

/// Freeze `value` and everything nested inside it.
///
/// # Examples
///
/// ```rust
/// use cascade_config::{deep_freeze, Freeze};
/// use serde_json::json;
///
/// let frozen = deep_freeze(json!({"nested": {"a": 1}}));
/// assert_eq!(frozen["nested"]["a"], 1);
///
/// let again = frozen.clone().deep_freeze();
/// assert!(again.ptr_eq(&frozen));
/// ```
pub fn deep_freeze<T: Freeze>(value: T) -> FrozenValue {
    value.deep_freeze()
}
