//! Read-only views that reject access to undefined properties.
//!
//! A [`ConfigView`] borrows one node of a configuration tree. In
//! [`AccessMode::Strict`] every keyed or indexed read of a property that is
//! not present fails with [`CascadeError::UndefinedProperty`]; in
//! [`AccessMode::Lenient`] such reads return an undefined view instead.
//! Iteration, length checks, scalar accessors and serialization never raise.

mod path;

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{CascadeError, CascadeResult, CascadeResultExt};

pub use path::KeyPath;

static UNDEFINED: Value = Value::Null;

/// Behaviour of keyed reads on properties that are not present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessMode {
    /// Reading an absent property is an error.
    #[default]
    Strict,
    /// Reading an absent property yields an undefined view.
    Lenient,
}

/// Borrowed, read-only view of a configuration node.
#[derive(Clone, Debug)]
pub struct ConfigView<'a> {
    node: Option<&'a Value>,
    path: KeyPath,
    mode: AccessMode,
}

/// Build a strict view of `value`.
///
/// # Examples
///
/// ```rust
/// use cascade_config::guard;
/// use serde_json::json;
///
/// let value = json!({"a": [1, 2, 3], "b": {"c": 2}});
/// let view = guard(&value);
/// assert_eq!(view.at("a.1")?.as_i64(), Some(2));
/// assert!(view.get("missing").is_err());
/// assert_eq!(view.get("a")?.iter().count(), 3);
/// # Ok::<_, std::sync::Arc<cascade_config::CascadeError>>(())
/// ```
#[must_use]
pub fn guard(value: &Value) -> ConfigView<'_> {
    ConfigView::new(value, AccessMode::Strict)
}

/// Parse `key` as a sequence index only when it is written the way the index
/// prints: no sign, padding or leading zeros.
fn canonical_index(key: &str) -> Option<usize> {
    key.parse::<usize>()
        .ok()
        .filter(|idx| idx.to_string() == key)
}

impl<'a> ConfigView<'a> {
    /// View the root `value` with `mode`.
    #[must_use]
    pub const fn new(value: &'a Value, mode: AccessMode) -> Self {
        Self {
            node: Some(value),
            path: KeyPath::root(),
            mode,
        }
    }

    /// The same node viewed with `mode`.
    #[must_use]
    pub const fn with_mode(mut self, mode: AccessMode) -> Self {
        self.mode = mode;
        self
    }

    /// The same node with optional-chaining reads.
    #[must_use]
    pub const fn lenient(self) -> Self {
        self.with_mode(AccessMode::Lenient)
    }

    /// Read the property `key`.
    ///
    /// Mappings are looked up by key; sequences accept `key` as a canonical
    /// decimal index, so `"1"` reads the second element but `"01"` and `"+1"`
    /// are absent.
    ///
    /// # Errors
    ///
    /// In strict mode returns [`CascadeError::UndefinedProperty`] when the
    /// property is not present, including any key read on a scalar.
    pub fn get(&self, key: &str) -> CascadeResult<Self> {
        let child = self.node.and_then(|node| match node {
            Value::Object(map) => map.get(key),
            Value::Array(items) => canonical_index(key).and_then(|idx| items.get(idx)),
            _ => None,
        });
        self.child(key, child)
    }

    /// Read the element at `index` of a sequence, or the key `index` of a
    /// mapping.
    ///
    /// # Errors
    ///
    /// In strict mode returns [`CascadeError::UndefinedProperty`] when
    /// `index` is out of bounds or the node has no such property.
    pub fn index(&self, index: usize) -> CascadeResult<Self> {
        self.get(&index.to_string())
    }

    /// Follow a dotted path such as `servers.0.host`.
    ///
    /// # Errors
    ///
    /// Fails on the first segment that [`Self::get`] rejects.
    pub fn at(&self, dotted: &str) -> CascadeResult<Self> {
        KeyPath::parse(dotted)
            .segments()
            .iter()
            .try_fold(self.clone(), |view, segment| view.get(segment))
    }

    fn child(&self, key: &str, node: Option<&'a Value>) -> CascadeResult<Self> {
        if node.is_none() && self.mode == AccessMode::Strict {
            return Err(CascadeError::undefined_property(key, self.path.to_string()));
        }
        Ok(Self {
            node,
            path: self.path.child(key),
            mode: self.mode,
        })
    }

    /// Returns `true` unless this view is the result of a lenient read of an
    /// absent property.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.node.is_some()
    }

    /// The viewed node, or `None` when undefined.
    #[must_use]
    pub const fn value(&self) -> Option<&'a Value> {
        self.node
    }

    /// Location of this node relative to the root.
    #[must_use]
    pub const fn path(&self) -> &KeyPath {
        &self.path
    }

    /// The access mode applied to reads through this view.
    #[must_use]
    pub const fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Iterate the elements of a sequence. Other nodes yield nothing.
    pub fn iter(&self) -> impl Iterator<Item = ConfigView<'a>> + '_ {
        self.node
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(idx, item)| self.defined_child(idx.to_string(), item))
    }

    /// Iterate the entries of a mapping in insertion order. Other nodes
    /// yield nothing.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, ConfigView<'a>)> + '_ {
        self.node
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .map(|(key, item)| (key.as_str(), self.defined_child(key.as_str(), item)))
    }

    /// Iterate the keys of a mapping in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.node
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    fn defined_child(&self, segment: impl Into<String>, node: &'a Value) -> Self {
        Self {
            node: Some(node),
            path: self.path.child(segment),
            mode: self.mode,
        }
    }

    /// Number of entries of a mapping or elements of a sequence; zero for
    /// anything else.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.node {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// Returns `true` when [`Self::len`] is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` for an explicit `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.node.is_some_and(Value::is_null)
    }

    /// The node as a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.node.and_then(Value::as_str)
    }

    /// The node as a signed integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.node.and_then(Value::as_i64)
    }

    /// The node as an unsigned integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.node.and_then(Value::as_u64)
    }

    /// The node as a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.node.and_then(Value::as_f64)
    }

    /// The node as a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.node.and_then(Value::as_bool)
    }

    /// Clone the viewed node into an unguarded value. Undefined views become
    /// `null`.
    #[must_use]
    pub fn to_plain(&self) -> Value {
        self.node.cloned().unwrap_or(Value::Null)
    }

    /// Deserialize the viewed node into `T`.
    ///
    /// Undefined views deserialize as `null`, so `Option<T>` targets yield
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Extract`] when the node does not match `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> CascadeResult<T> {
        T::deserialize(self.node.unwrap_or(&UNDEFINED)).extract_at(&self.path.to_string())
    }

    /// Read `key` and deserialize it into `T`.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Self::get`] or [`Self::extract`].
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> CascadeResult<T> {
        self.get(key)?.extract()
    }
}

impl Serialize for ConfigView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node {
            Some(node) => node.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl PartialEq<Value> for ConfigView<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.node == Some(other)
    }
}
