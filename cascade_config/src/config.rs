//! The configuration handle returned by [`crate::load`].

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::freeze::{Freeze, FrozenValue};
use crate::guard::{AccessMode, ConfigView, KeyPath};
use crate::{CascadeError, CascadeResult};

const ROOT: &str = "<root>";

#[derive(Clone, Debug, PartialEq)]
enum Root {
    Mutable(Value),
    Frozen(FrozenValue),
}

impl Root {
    fn as_value(&self) -> &Value {
        match self {
            Self::Mutable(value) => value,
            Self::Frozen(frozen) => frozen.as_value(),
        }
    }
}

/// Merged configuration with its access and mutation policy.
///
/// A guarded config rejects reads of properties that are not present; an
/// unguarded one returns undefined views for them. A frozen config rejects
/// every write with [`CascadeError::Frozen`].
///
/// ```rust
/// use cascade_config::Config;
/// use serde_json::json;
///
/// let config = Config::new(json!({"x": 1})).guarded(true).freeze();
/// assert_eq!(config.at("x")?.as_i64(), Some(1));
/// assert!(config.at("y").is_err());
///
/// let mut config = config;
/// assert!(config.set("x", json!(2)).is_err());
/// # Ok::<_, std::sync::Arc<cascade_config::CascadeError>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    root: Root,
    guarded: bool,
}

impl Config {
    /// Wrap `value` as an unguarded, mutable config.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self {
            root: Root::Mutable(value),
            guarded: false,
        }
    }

    /// Enable or disable the undefined-property guard.
    #[must_use]
    pub const fn guarded(mut self, guarded: bool) -> Self {
        self.guarded = guarded;
        self
    }

    /// Make the config permanently read-only. Freezing twice is a no-op.
    #[must_use]
    pub fn freeze(self) -> Self {
        let root = match self.root {
            Root::Mutable(value) => Root::Frozen(value.deep_freeze()),
            frozen @ Root::Frozen(_) => frozen,
        };
        Self { root, ..self }
    }

    /// Returns `true` when reads of absent properties fail.
    #[must_use]
    pub const fn is_guarded(&self) -> bool {
        self.guarded
    }

    /// Returns `true` when writes are rejected.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        matches!(self.root, Root::Frozen(_))
    }

    /// A view of the root following this config's access policy.
    #[must_use]
    pub fn view(&self) -> ConfigView<'_> {
        let mode = if self.guarded {
            AccessMode::Strict
        } else {
            AccessMode::Lenient
        };
        ConfigView::new(self.root.as_value(), mode)
    }

    /// Read the top-level property `key`.
    ///
    /// # Errors
    ///
    /// A guarded config returns [`CascadeError::UndefinedProperty`] when
    /// `key` is not present.
    pub fn get(&self, key: &str) -> CascadeResult<ConfigView<'_>> {
        self.view().get(key)
    }

    /// Read the element at `index` of a sequence root.
    ///
    /// # Errors
    ///
    /// See [`ConfigView::index`].
    pub fn index(&self, index: usize) -> CascadeResult<ConfigView<'_>> {
        self.view().index(index)
    }

    /// Follow a dotted path such as `server.port`.
    ///
    /// # Errors
    ///
    /// A guarded config returns [`CascadeError::UndefinedProperty`] for the
    /// first segment that is not present.
    pub fn at(&self, dotted: &str) -> CascadeResult<ConfigView<'_>> {
        self.view().at(dotted)
    }

    /// Deserialize the whole config into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Extract`] when the config does not match `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> CascadeResult<T> {
        self.view().extract()
    }

    /// Deserialize the top-level property `key` into `T`.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Self::get`] or [`CascadeError::Extract`].
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> CascadeResult<T> {
        self.view().get_as(key)
    }

    /// Borrow the merged value without any guard.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        self.root.as_value()
    }

    /// Clone the merged value into a plain, mutable value.
    #[must_use]
    pub fn to_plain(&self) -> Value {
        self.as_value().clone()
    }

    /// Consume the config and return its value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self.root {
            Root::Mutable(value) => value,
            Root::Frozen(frozen) => frozen.into_value(),
        }
    }

    /// Mutable access to the root value.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Frozen`] when the config is frozen.
    pub fn value_mut(&mut self) -> CascadeResult<&mut Value> {
        match &mut self.root {
            Root::Mutable(value) => Ok(value),
            Root::Frozen(_) => Err(CascadeError::frozen(ROOT)),
        }
    }

    /// Assign `value` at the dotted `path`, creating intermediate mappings.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Frozen`] when the config is frozen and
    /// [`CascadeError::InvalidPath`] when the path is empty or crosses a
    /// value that is not a mapping.
    pub fn set(&mut self, path: &str, value: Value) -> CascadeResult<()> {
        let root = self.writable(path)?;
        let key_path = KeyPath::parse(path);
        let Some((parents, last)) = key_path.split_last() else {
            return Err(CascadeError::invalid_path(path, "cannot replace the root"));
        };
        let Some(map) = descend(root, parents, path, true)? else {
            return Err(CascadeError::invalid_path(path, "missing parent mapping"));
        };
        map.insert(last.to_owned(), value);
        Ok(())
    }

    /// Remove the property at the dotted `path`, returning its value.
    ///
    /// Removing a property that is not present returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::Frozen`] when the config is frozen and
    /// [`CascadeError::InvalidPath`] when the path is empty or crosses a
    /// value that is not a mapping.
    pub fn remove(&mut self, path: &str) -> CascadeResult<Option<Value>> {
        let root = self.writable(path)?;
        let key_path = KeyPath::parse(path);
        let Some((parents, last)) = key_path.split_last() else {
            return Err(CascadeError::invalid_path(path, "cannot remove the root"));
        };
        Ok(descend(root, parents, path, false)?.and_then(|map| map.shift_remove(last)))
    }

    fn writable(&mut self, path: &str) -> CascadeResult<&mut Value> {
        match &mut self.root {
            Root::Mutable(value) => Ok(value),
            Root::Frozen(_) => Err(CascadeError::frozen(path)),
        }
    }
}

/// Walk `parents` from `node` and return the mapping they lead to.
///
/// With `create`, absent segments are inserted as empty mappings; otherwise
/// an absent segment yields `Ok(None)`.
fn descend<'v>(
    mut node: &'v mut Value,
    parents: &[String],
    path: &str,
    create: bool,
) -> CascadeResult<Option<&'v mut Map<String, Value>>> {
    for (depth, segment) in parents.iter().enumerate() {
        let Value::Object(map) = node else {
            return Err(not_a_mapping(path, parents.get(..depth)));
        };
        node = if create {
            map.entry(segment.as_str())
                .or_insert_with(|| Value::Object(Map::new()))
        } else {
            match map.get_mut(segment) {
                Some(child) => child,
                None => return Ok(None),
            }
        };
    }
    match node {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(not_a_mapping(path, Some(parents))),
    }
}

fn not_a_mapping(path: &str, blocking: Option<&[String]>) -> std::sync::Arc<CascadeError> {
    let location = match blocking {
        Some(segments) if !segments.is_empty() => format!("'{}'", segments.join(".")),
        _ => "the root".to_owned(),
    };
    CascadeError::invalid_path(path, format!("value at {location} is not a mapping"))
}

impl From<Value> for Config {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_value().serialize(serializer)
    }
}
