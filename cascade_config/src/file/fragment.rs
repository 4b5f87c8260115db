//! Probe, read and parse a single configuration fragment.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::env::EnvLookup;
use crate::{CascadeError, CascadeResult};

use super::error::unsupported_extension;
use super::helpers::{candidate_path, read_resolved};
use super::registry::LoaderRegistry;

/// Top-level key holding a fragment's named export when it is the
/// document's only key.
pub const NAMED_EXPORT: &str = "config";

/// An empty mapping, the value of a fragment that contributes nothing.
#[must_use]
pub fn empty_mapping() -> Value {
    Value::Object(Map::new())
}

/// Describes one fragment to load.
#[derive(Clone, Copy, Debug)]
pub struct FragmentRequest<'a> {
    /// Path of the fragment without an extension, for example
    /// `config/default`.
    pub base_path: &'a Utf8Path,
    /// Extensions to probe, in priority order.
    pub extensions: &'a [String],
    /// Whether a missing or broken fragment is an error.
    pub required: bool,
}

/// The file chosen to back a fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    /// Full path of the file, including its extension.
    pub path: Utf8PathBuf,
    /// The extension that matched.
    pub extension: String,
}

/// Loads fragments using the parsers of a [`LoaderRegistry`].
///
/// Nothing is cached: every call probes the filesystem and reads the selected
/// file again.
#[derive(Clone, Copy)]
pub struct FragmentLoader<'a> {
    registry: &'a LoaderRegistry,
    env: &'a dyn EnvLookup,
}

impl<'a> FragmentLoader<'a> {
    /// Create a loader using `registry` for parsing and `env` for
    /// environment-aware formats.
    #[must_use]
    pub const fn new(registry: &'a LoaderRegistry, env: &'a dyn EnvLookup) -> Self {
        Self { registry, env }
    }

    /// Returns the first file matching `request`, if any.
    #[must_use]
    pub fn locate(&self, request: &FragmentRequest<'_>) -> Option<SelectedFile> {
        probe(request)
    }

    /// Load the fragment described by `request`.
    ///
    /// Optional fragments that are missing or fail to load yield an empty
    /// mapping.
    ///
    /// # Errors
    ///
    /// For required fragments, returns [`CascadeError::NotFound`] when no
    /// file exists, [`CascadeError::UnsupportedExtension`] when no loader is
    /// registered for the selected file, [`CascadeError::LoadFailure`] when it
    /// cannot be read or parsed, and [`CascadeError::ExportMissing`] when it
    /// exports nothing.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use camino::Utf8Path;
    /// use cascade_config::{FragmentLoader, FragmentRequest, LoaderRegistry, ProcessEnv};
    ///
    /// # fn run() -> cascade_config::CascadeResult<()> {
    /// let registry = LoaderRegistry::default();
    /// let loader = FragmentLoader::new(&registry, &ProcessEnv);
    /// let extensions = ["toml".to_owned(), "json".to_owned()];
    /// let value = loader.load(&FragmentRequest {
    ///     base_path: Utf8Path::new("config/default"),
    ///     extensions: &extensions,
    ///     required: true,
    /// })?;
    /// # let _ = value;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(&self, request: &FragmentRequest<'_>) -> CascadeResult<Value> {
        let Some(selected) = probe(request) else {
            if request.required {
                return Err(CascadeError::not_found(request.base_path, request.extensions).into());
            }
            trace!(base_path = %request.base_path, "optional fragment not present");
            return Ok(empty_mapping());
        };
        match self.read_selected(&selected) {
            Ok(value) => Ok(value),
            Err(err) if request.required => Err(err),
            Err(err) => {
                debug!(path = %selected.path, error = %err, "ignoring optional fragment");
                Ok(empty_mapping())
            }
        }
    }

    fn read_selected(&self, selected: &SelectedFile) -> CascadeResult<Value> {
        let path = selected.path.as_path();
        let loader = self
            .registry
            .loader_for(&selected.extension)
            .ok_or_else(|| unsupported_extension(path, &selected.extension))?;
        let contents = read_resolved(path).map_err(|err| CascadeError::load_failure(path, err))?;
        debug!(path = %path, loader = ?loader, "loading fragment");
        let document = loader
            .parse(path, &contents, self.env)?
            .ok_or_else(|| CascadeError::export_missing(path))?;
        Ok(select_export(document))
    }
}

impl std::fmt::Debug for FragmentLoader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentLoader")
            .field("registry", self.registry)
            .finish_non_exhaustive()
    }
}

/// Find the first extension whose file exists next to `base_path`.
///
/// Symlinks are followed, and a missing directory simply has no files.
fn probe(request: &FragmentRequest<'_>) -> Option<SelectedFile> {
    request.extensions.iter().find_map(|extension| {
        let path = candidate_path(request.base_path, extension);
        if path.is_file() {
            Some(SelectedFile {
                path,
                extension: extension.clone(),
            })
        } else {
            trace!(base_path = %request.base_path, extension = %extension, "no fragment file");
            None
        }
    })
}

/// A document whose only top-level key is a non-null `config` exports that
/// value. Any other document, including one where `config` sits beside
/// other keys, is exported whole.
fn select_export(document: Value) -> Value {
    match document {
        Value::Object(mut map)
            if map.len() == 1 && map.get(NAMED_EXPORT).is_some_and(|named| !named.is_null()) =>
        {
            map.remove(NAMED_EXPORT).unwrap_or_else(empty_mapping)
        }
        other => other,
    }
}
