//! Shared helpers for file module tests along with focused submodules.

use camino::Utf8Path;
use serde_json::Value;

use crate::CascadeResult;
use crate::env::{EmptyEnv, EnvLookup};
use crate::file::{FragmentLoader, FragmentRequest, LoaderRegistry};

pub(super) use crate::test_support::{to_anyhow, with_jail};

pub(super) mod format_tests;

pub(super) fn extensions(list: &[&str]) -> Vec<String> {
    list.iter().map(|ext| (*ext).to_owned()).collect()
}

/// Load `base` from the jail's working directory with the default registry.
pub(super) fn load_fragment(base: &str, exts: &[&str], required: bool) -> CascadeResult<Value> {
    load_fragment_with_env(base, exts, required, &EmptyEnv)
}

pub(super) fn load_fragment_with_env(
    base: &str,
    exts: &[&str],
    required: bool,
    env: &dyn EnvLookup,
) -> CascadeResult<Value> {
    let registry = LoaderRegistry::default();
    let exts = extensions(exts);
    FragmentLoader::new(&registry, env).load(&FragmentRequest {
        base_path: Utf8Path::new(base),
        extensions: &exts,
        required,
    })
}
