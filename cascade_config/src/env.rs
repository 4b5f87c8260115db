//! Access to environment variables as an injected capability.
//!
//! The loader never reads the process environment directly. Instead it asks
//! an [`EnvLookup`], which defaults to [`ProcessEnv`] and can be replaced by a
//! map in tests.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only lookup of environment variables.
pub trait EnvLookup: Send + Sync {
    /// Returns the value of `key`, or `None` when it is unset or not valid
    /// Unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the value of `key` when it is set to a non-empty string.
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// [`EnvLookup`] backed by the process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher + Send + Sync> EnvLookup for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<E: EnvLookup + ?Sized> EnvLookup for &E {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

impl<E: EnvLookup + ?Sized> EnvLookup for std::sync::Arc<E> {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Lookup that reports every variable as unset.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyEnv;

impl EnvLookup for EmptyEnv {
    fn var(&self, _key: &str) -> Option<String> {
        None
    }
}
