//! Hierarchical configuration loading from convention-named fragment files.
//!
//! A configuration directory holds fragments such as `default.toml`,
//! `production.toml`, `local.toml` and `custom-environment-variables.toml`.
//! [`load`] resolves which of them exist, loads them in a fixed precedence
//! order and deep-merges the results into a single [`serde_json::Value`].
//!
//! The merged value is returned twice:
//!
//! - [`LoadedConfig::config`] is a [`Config`] handle. By default it is
//!   guarded (reading a property that is not present fails with
//!   [`CascadeError::UndefinedProperty`]) and frozen (writes fail with
//!   [`CascadeError::Frozen`]).
//! - [`LoadedConfig::unsecure_config`] is a plain, mutable copy.
//!
//! ```rust,no_run
//! use cascade_config::{LoadOptions, load};
//!
//! # fn run() -> cascade_config::CascadeResult<()> {
//! let loaded = load(LoadOptions::new().environment("production"))?;
//! let port = loaded.config.at("server.port")?.as_u64();
//! # let _ = port;
//! # Ok(())
//! # }
//! ```
//!
//! Fragments are merged in this order, later entries overriding earlier ones:
//!
//! 1. `default` (required)
//! 2. `default-{variant}`
//! 3. `{environment}`
//! 4. `{environment}-{variant}`
//! 5. `local`
//! 6. `local-{variant}`
//! 7. `local-{environment}`
//! 8. `custom-environment-variables`

use std::sync::Arc;

mod config;
pub mod env;
mod error;
pub mod file;
mod freeze;
mod guard;
mod load;
pub mod merge;
pub mod resolve;
mod result_ext;
#[cfg(test)]
mod test_support;

pub use config::Config;
pub use env::{EnvLookup, ProcessEnv};
pub use error::CascadeError;
pub use file::{FileLoader, FragmentLoader, FragmentRequest, LoaderRegistry};
pub use freeze::{Freeze, FrozenValue, deep_freeze};
pub use guard::{AccessMode, ConfigView, KeyPath, guard};
pub use load::{
    DEFAULT_CONFIG_DIR, DEFAULT_FILE_EXTENSIONS, ENVIRONMENT_VAR, LoadOptions, LoadedConfig,
    VARIANT_VAR, load,
};
pub use merge::{deep_merge, is_mergeable, merged};
pub use resolve::{FragmentSetResolver, ResolveRequest};
pub use result_ext::CascadeResultExt;

pub use serde_json;

/// Result type used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so they can be logged and propagated
/// without cloning the underlying sources.
pub type CascadeResult<T> = Result<T, Arc<CascadeError>>;
