//! Resolution of the fragment set for a configuration directory.
//!
//! [`FragmentSetResolver`] walks the [`fragment_plan`] for a directory, loads
//! each fragment with a [`FragmentLoader`] and deep-merges the results in
//! precedence order.

mod plan;

use camino::Utf8Path;
use serde_json::Value;
use tracing::{debug, warn};

use crate::env::EnvLookup;
use crate::file::{FragmentLoader, FragmentRequest, LoaderRegistry, empty_mapping};
use crate::merge::deep_merge;
use crate::{CascadeError, CascadeResult};

pub use plan::{
    ENV_OVERRIDES_FRAGMENT, ExtensionFilter, FragmentPolicy, FragmentSlot, fragment_plan,
};

/// Inputs for resolving one configuration directory.
#[derive(Clone, Copy, Debug)]
pub struct ResolveRequest<'a> {
    /// Directory holding the fragments.
    pub config_dir: &'a Utf8Path,
    /// Selects the `{environment}` fragments.
    pub environment: Option<&'a str>,
    /// Selects the `{variant}` fragments.
    pub variant: Option<&'a str>,
    /// Extensions to probe for each fragment, in priority order.
    pub extensions: &'a [String],
}

/// Loads and merges every fragment of a directory.
#[derive(Clone, Copy)]
pub struct FragmentSetResolver<'a> {
    registry: &'a LoaderRegistry,
    env: &'a dyn EnvLookup,
}

impl<'a> FragmentSetResolver<'a> {
    /// Create a resolver parsing fragments with `registry`.
    #[must_use]
    pub const fn new(registry: &'a LoaderRegistry, env: &'a dyn EnvLookup) -> Self {
        Self { registry, env }
    }

    /// Load every fragment of `request.config_dir` and merge them.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotFound`] when the directory has no `default`
    /// fragment, or the error raised while loading `default`. Failures of the
    /// `{environment}` fragment are logged and ignored; other fragments are
    /// optional.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use camino::Utf8Path;
    /// use cascade_config::{FragmentSetResolver, LoaderRegistry, ProcessEnv, ResolveRequest};
    ///
    /// # fn run() -> cascade_config::CascadeResult<()> {
    /// let registry = LoaderRegistry::default();
    /// let extensions = ["toml".to_owned(), "json".to_owned()];
    /// let merged = FragmentSetResolver::new(&registry, &ProcessEnv).resolve(&ResolveRequest {
    ///     config_dir: Utf8Path::new("config"),
    ///     environment: Some("production"),
    ///     variant: None,
    ///     extensions: &extensions,
    /// })?;
    /// # let _ = merged;
    /// # Ok(())
    /// # }
    /// ```
    pub fn resolve(&self, request: &ResolveRequest<'_>) -> CascadeResult<Value> {
        let loader = FragmentLoader::new(self.registry, self.env);
        let env_aware = self.registry.environment_extensions(request.extensions);
        let mut merged = empty_mapping();
        for slot in fragment_plan(request.environment, request.variant) {
            let extensions = match slot.extensions {
                ExtensionFilter::All => request.extensions,
                ExtensionFilter::EnvironmentAware => env_aware.as_slice(),
            };
            let base_path = request.config_dir.join(&slot.name);
            let fragment = FragmentRequest {
                base_path: &base_path,
                extensions,
                required: slot.policy != FragmentPolicy::Optional,
            };
            let value = match loader.load(&fragment) {
                Ok(value) => value,
                Err(err) if slot.policy == FragmentPolicy::WarnOnFailure => {
                    warn_environment_failure(&slot.name, &err);
                    continue;
                }
                Err(err) => return Err(err),
            };
            debug!(fragment = %base_path, "merging fragment");
            deep_merge(&mut merged, [value]);
        }
        Ok(merged)
    }
}

fn warn_environment_failure(environment: &str, err: &CascadeError) {
    if err.is_not_found() {
        warn!(environment, "environment {environment} defined but no config file found");
    } else {
        warn!(environment, error = %err, "environment {environment} config file failed to load");
    }
}

impl std::fmt::Debug for FragmentSetResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentSetResolver")
            .field("registry", self.registry)
            .finish_non_exhaustive()
    }
}
