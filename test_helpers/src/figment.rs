//! Shared helpers for working with `figment::Jail` in tests.
//!
//! A jail gives each test a fresh temporary working directory and restores
//! any environment variables it sets, which is exactly the state the loader
//! reads: `./config` and `APP_ENV`.

use anyhow::{Result, anyhow};

/// Executes `f` inside a [`figment::Jail`], returning the closure's output.
///
/// The jail is torn down automatically once the closure completes, even when
/// the closure returns an error.
///
/// # Errors
///
/// Returns an error if the jail initialisation fails or the closure returns a
/// [`figment::error::Error`].
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|j| {
        output = Some(f(j)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure did not return a value"))
}

/// Converts any error implementing [`ToString`] into a [`figment::Error`].
///
/// Loader errors are shared as `Arc<CascadeError>`, so callers usually pass a
/// reference.
pub fn figment_error<E: ToString + ?Sized>(err: &E) -> figment::Error {
    figment::Error::from(err.to_string())
}
