//! Registry mapping file extensions to [`FileLoader`] implementations.

use std::fmt;
use std::sync::Arc;

use super::formats::{FileLoader, JsonLoader, TomlLoader};

/// Set of [`FileLoader`]s keyed by the extensions they handle.
///
/// Loaders registered later take priority over earlier ones for the same
/// extension, so applications can override a built-in format.
#[derive(Clone)]
pub struct LoaderRegistry {
    loaders: Vec<Arc<dyn FileLoader>>,
}

impl LoaderRegistry {
    /// Create a registry without any loaders.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Register `loader`, giving it priority over existing loaders.
    pub fn register(&mut self, loader: Arc<dyn FileLoader>) -> &mut Self {
        self.loaders.push(loader);
        self
    }

    /// Builder-style form of [`Self::register`].
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn FileLoader>) -> Self {
        self.register(loader);
        self
    }

    /// Returns the loader responsible for `extension`, if any.
    #[must_use]
    pub fn loader_for(&self, extension: &str) -> Option<&dyn FileLoader> {
        self.loaders
            .iter()
            .rev()
            .find(|loader| loader.can_handle(extension))
            .map(Arc::as_ref)
    }

    /// Returns `true` when the loader for `extension` computes values from the
    /// environment. Unknown extensions return `false`.
    #[must_use]
    pub fn evaluates_environment(&self, extension: &str) -> bool {
        self.loader_for(extension)
            .is_some_and(FileLoader::evaluates_environment)
    }

    /// Keep only the `extensions` whose loader computes values from the
    /// environment, preserving their order.
    #[must_use]
    pub fn environment_extensions<S: AsRef<str>>(&self, extensions: &[S]) -> Vec<String> {
        extensions
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|ext| self.evaluates_environment(ext))
            .map(str::to_owned)
            .collect()
    }

    /// Every extension handled by a registered loader.
    #[must_use]
    pub fn extensions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for loader in &self.loaders {
            for ext in loader.extensions() {
                if !out.iter().any(|known| known.eq_ignore_ascii_case(ext)) {
                    out.push((*ext).to_owned());
                }
            }
        }
        out
    }
}

impl Default for LoaderRegistry {
    /// Registry with the built-in formats: TOML and JSON, plus YAML and JSON5
    /// when the matching features are enabled.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Arc::new(JsonLoader))
            .register(Arc::new(TomlLoader));
        #[cfg(feature = "yaml")]
        registry.register(Arc::new(super::formats::YamlLoader));
        #[cfg(feature = "json5")]
        registry.register(Arc::new(super::formats::Json5Loader));
        registry
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}
