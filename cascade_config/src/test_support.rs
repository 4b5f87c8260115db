//! Jail and error adapters shared by unit tests.

use anyhow::{Result, anyhow};
use test_helpers::figment::figment_error;

use crate::CascadeResult;

/// Run `f` inside a jail, letting the body use `anyhow` errors.
pub(crate) fn with_jail<F>(f: F) -> Result<()>
where
    F: FnOnce(&mut figment::Jail) -> Result<()>,
{
    test_helpers::figment::with_jail(|jail| f(jail).map_err(|err| figment_error(&err)))
}

pub(crate) fn to_anyhow<T>(result: CascadeResult<T>) -> Result<T> {
    result.map_err(|err| anyhow!(err.to_string()))
}
