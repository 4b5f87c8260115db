//! Loading the merged configuration of one or more directories.
//!
//! [`LoadOptions`] collects the directories, the environment and variant
//! selectors, the candidate extensions and the access policy. [`load`]
//! resolves every directory in order and wraps the merged value in a
//! [`Config`].

use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::env::{EnvLookup, ProcessEnv};
use crate::file::{LoaderRegistry, empty_mapping};
use crate::merge::deep_merge;
use crate::resolve::{FragmentSetResolver, ResolveRequest};
use crate::{CascadeError, CascadeResult};

/// Directory, relative to the working directory, used when none is given.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable selecting the `{environment}` fragments.
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Environment variable selecting the `{variant}` fragments.
pub const VARIANT_VAR: &str = "APP_VARIANT";

/// Extensions probed when none are given, in priority order.
pub const DEFAULT_FILE_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Where a fragment selector comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Selector {
    FromEnv(String),
    Fixed(String),
    Disabled,
}

impl Selector {
    fn resolve(&self, env: &dyn EnvLookup) -> Option<String> {
        match self {
            Self::FromEnv(key) => env.non_empty_var(key),
            Self::Fixed(name) => Some(name.clone()).filter(|name| !name.is_empty()),
            Self::Disabled => None,
        }
    }
}

/// Options for [`load`].
///
/// # Examples
///
/// ```rust
/// use cascade_config::LoadOptions;
/// use std::collections::BTreeMap;
///
/// let env = BTreeMap::from([("APP_ENV".to_owned(), "staging".to_owned())]);
/// let options = LoadOptions::new().env(env).variant("blue");
/// assert_eq!(options.resolved_environment().as_deref(), Some("staging"));
/// assert_eq!(options.resolved_variant().as_deref(), Some("blue"));
/// ```
#[derive(Clone)]
pub struct LoadOptions {
    config_dirs: Option<Vec<Utf8PathBuf>>,
    environment: Selector,
    variant: Selector,
    file_extensions: Vec<String>,
    throw_on_undefined_prop: bool,
    freeze_config: bool,
    registry: LoaderRegistry,
    env: Arc<dyn EnvLookup>,
}

impl LoadOptions {
    /// Options with every default applied: `<cwd>/config`, selectors read
    /// from [`ENVIRONMENT_VAR`] and [`VARIANT_VAR`], the
    /// [`DEFAULT_FILE_EXTENSIONS`], a guarded and frozen result, the built-in
    /// loaders and the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dirs: None,
            environment: Selector::FromEnv(ENVIRONMENT_VAR.to_owned()),
            variant: Selector::FromEnv(VARIANT_VAR.to_owned()),
            file_extensions: Vec::from(DEFAULT_FILE_EXTENSIONS.map(str::to_owned)),
            throw_on_undefined_prop: true,
            freeze_config: true,
            registry: LoaderRegistry::default(),
            env: Arc::new(ProcessEnv),
        }
    }

    /// Add `dir` to the directories to load. The first call replaces the
    /// default directory.
    #[must_use]
    pub fn config_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.config_dirs.get_or_insert_with(Vec::new).push(dir.into());
        self
    }

    /// Replace the directories to load. Later directories override earlier
    /// ones.
    #[must_use]
    pub fn config_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.config_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Use `name` as the environment instead of reading it from the
    /// environment. An empty name disables the environment fragments.
    #[must_use]
    pub fn environment(mut self, name: impl Into<String>) -> Self {
        self.environment = Selector::Fixed(name.into());
        self
    }

    /// Read the environment from the variable `key`.
    #[must_use]
    pub fn environment_var(mut self, key: impl Into<String>) -> Self {
        self.environment = Selector::FromEnv(key.into());
        self
    }

    /// Skip every `{environment}` fragment.
    #[must_use]
    pub fn without_environment(mut self) -> Self {
        self.environment = Selector::Disabled;
        self
    }

    /// Use `name` as the variant instead of reading it from the
    /// environment. An empty name disables the variant fragments.
    #[must_use]
    pub fn variant(mut self, name: impl Into<String>) -> Self {
        self.variant = Selector::Fixed(name.into());
        self
    }

    /// Read the variant from the variable `key`.
    #[must_use]
    pub fn variant_var(mut self, key: impl Into<String>) -> Self {
        self.variant = Selector::FromEnv(key.into());
        self
    }

    /// Skip every `{variant}` fragment.
    #[must_use]
    pub fn without_variant(mut self) -> Self {
        self.variant = Selector::Disabled;
        self
    }

    /// Replace the candidate extensions, highest priority first.
    #[must_use]
    pub fn file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether reads of absent properties fail. Defaults to `true`.
    #[must_use]
    pub const fn throw_on_undefined_prop(mut self, enabled: bool) -> Self {
        self.throw_on_undefined_prop = enabled;
        self
    }

    /// Whether the result rejects writes. Defaults to `true`.
    #[must_use]
    pub const fn freeze_config(mut self, enabled: bool) -> Self {
        self.freeze_config = enabled;
        self
    }

    /// Parse fragments with `registry` instead of the built-in loaders.
    #[must_use]
    pub fn registry(mut self, registry: LoaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Read environment variables from `env` instead of the process.
    #[must_use]
    pub fn env(mut self, env: impl EnvLookup + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// The environment that [`load`] would use.
    #[must_use]
    pub fn resolved_environment(&self) -> Option<String> {
        self.environment.resolve(self.env.as_ref())
    }

    /// The variant that [`load`] would use.
    #[must_use]
    pub fn resolved_variant(&self) -> Option<String> {
        self.variant.resolve(self.env.as_ref())
    }

    /// The directories that [`load`] would read, in merge order.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::WorkingDirectory`] when no directory was given
    /// and the working directory cannot be determined or is not UTF-8.
    pub fn resolved_config_dirs(&self) -> CascadeResult<Vec<Utf8PathBuf>> {
        if let Some(dirs) = &self.config_dirs {
            return Ok(dirs.clone());
        }
        let cwd = std::env::current_dir()
            .and_then(|dir| {
                Utf8PathBuf::from_path_buf(dir).map_err(|path| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("working directory {} is not UTF-8", path.display()),
                    )
                })
            })
            .map_err(|source| Arc::new(CascadeError::WorkingDirectory { source }))?;
        Ok(vec![cwd.join(DEFAULT_CONFIG_DIR)])
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("config_dirs", &self.config_dirs)
            .field("environment", &self.environment)
            .field("variant", &self.variant)
            .field("file_extensions", &self.file_extensions)
            .field("throw_on_undefined_prop", &self.throw_on_undefined_prop)
            .field("freeze_config", &self.freeze_config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Result of [`load`].
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    /// The merged configuration under the requested guard and freeze policy.
    pub config: Config,
    /// An independent, unguarded and mutable copy of the merged value.
    pub unsecure_config: Value,
}

/// Load and merge every configured directory.
///
/// Directories are resolved in order; values from later directories override
/// earlier ones.
///
/// # Errors
///
/// Returns [`CascadeError::NotFound`] when a directory has no `default`
/// fragment, any error raised while loading a `default` fragment, and
/// [`CascadeError::WorkingDirectory`] when the default directory cannot be
/// derived.
///
/// # Examples
///
/// ```rust,no_run
/// use cascade_config::{LoadOptions, load};
///
/// # fn run() -> cascade_config::CascadeResult<()> {
/// let loaded = load(
///     LoadOptions::new()
///         .config_dirs(["config", "/etc/myapp"])
///         .without_variant()
///         .freeze_config(false),
/// )?;
/// let mut config = loaded.config;
/// config.set("server.port", serde_json::json!(9000))?;
/// # Ok(())
/// # }
/// ```
pub fn load(options: LoadOptions) -> CascadeResult<LoadedConfig> {
    let dirs = options.resolved_config_dirs()?;
    let environment = options.resolved_environment();
    let variant = options.resolved_variant();
    let LoadOptions {
        file_extensions,
        throw_on_undefined_prop,
        freeze_config,
        registry,
        env,
        ..
    } = options;
    debug!(
        dirs = ?dirs,
        environment = ?environment,
        variant = ?variant,
        extensions = ?file_extensions,
        "loading configuration"
    );

    let resolver = FragmentSetResolver::new(&registry, env.as_ref());
    let mut merged = empty_mapping();
    for dir in &dirs {
        let value = resolver.resolve(&ResolveRequest {
            config_dir: dir,
            environment: environment.as_deref(),
            variant: variant.as_deref(),
            extensions: &file_extensions,
        })?;
        deep_merge(&mut merged, [value]);
    }

    let unsecure_config = merged.clone();
    let config = Config::new(merged).guarded(throw_on_undefined_prop);
    let config = if freeze_config { config.freeze() } else { config };
    Ok(LoadedConfig {
        config,
        unsecure_config,
    })
}
