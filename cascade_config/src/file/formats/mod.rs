//! Format-specific parsers for configuration fragments.

use std::fmt;

use camino::Utf8Path;
use serde_json::Value;

use crate::CascadeResult;
use crate::env::EnvLookup;

mod json;
#[cfg(feature = "json5")]
mod json5;
mod toml;
#[cfg(feature = "yaml")]
mod yaml;

pub use self::json::JsonLoader;
#[cfg(feature = "json5")]
pub use self::json5::Json5Loader;
pub use self::toml::TomlLoader;
#[cfg(feature = "yaml")]
pub use self::yaml::YamlLoader;

/// Parser for one or more fragment file extensions.
///
/// Implementations receive the file contents, freshly read for every load,
/// and return the parsed document. `Ok(None)` means the file exports nothing.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8Path;
/// use cascade_config::env::EnvLookup;
/// use cascade_config::{CascadeResult, FileLoader, LoaderRegistry};
/// use serde_json::{Value, json};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct KeyValueLoader;
///
/// impl FileLoader for KeyValueLoader {
///     fn extensions(&self) -> &[&str] {
///         &["kv"]
///     }
///
///     fn parse(
///         &self,
///         _path: &Utf8Path,
///         contents: &str,
///         _env: &dyn EnvLookup,
///     ) -> CascadeResult<Option<Value>> {
///         let map = contents
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_owned(), json!(v.trim())))
///             .collect();
///         Ok(Some(Value::Object(map)))
///     }
/// }
///
/// let registry = LoaderRegistry::default().with_loader(Arc::new(KeyValueLoader));
/// assert!(registry.loader_for("kv").is_some());
/// ```
pub trait FileLoader: Send + Sync + fmt::Debug {
    /// Extensions, without the leading dot, handled by this loader.
    fn extensions(&self) -> &[&str];

    /// Returns `true` when this loader parses files with `extension`.
    fn can_handle(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension))
    }

    /// Returns `true` when values are computed from the environment at load
    /// time. Only such loaders may back `custom-environment-variables`.
    fn evaluates_environment(&self) -> bool {
        false
    }

    /// Parse `contents` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CascadeError::LoadFailure`] when the contents are
    /// malformed.
    fn parse(
        &self,
        path: &Utf8Path,
        contents: &str,
        env: &dyn EnvLookup,
    ) -> CascadeResult<Option<Value>>;
}
