//! Shared helpers for integration tests.

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;
use cascade_config::CascadeResult;

/// Absolute path of the fixture directory `name`.
#[must_use]
pub fn fixture_dir(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Convert a loader result into an `anyhow` result for `?` in tests.
pub fn ok<T>(result: CascadeResult<T>) -> Result<T> {
    result.map_err(|err| anyhow!(err.to_string()))
}
