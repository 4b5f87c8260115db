//! Extensions for mapping errors to `CascadeResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| CascadeError::…(e).into())`
//! patterns when converting parser and I/O failures into the crate's
//! `CascadeResult<T>` alias (`Result<T, Arc<CascadeError>>`).
//!
//! # Examples
//!
//! ```
//! use camino::Utf8Path;
//! use cascade_config::{CascadeResult, CascadeResultExt};
//!
//! fn parse(path: &Utf8Path, data: &str) -> CascadeResult<serde_json::Value> {
//!     serde_json::from_str(data).load_failure_at(path)
//! }
//!
//! let err = parse(Utf8Path::new("default.json"), "{").unwrap_err();
//! assert!(err.to_string().contains("default.json"));
//! ```

use camino::Utf8Path;

use crate::{CascadeError, CascadeResult};

/// Maps any `Result<T, E>` with a boxable error into a `CascadeResult<T>`.
pub trait CascadeResultExt<T> {
    /// Convert the error into [`CascadeError::LoadFailure`] for `path`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error when the input is `Err`.
    fn load_failure_at(self, path: &Utf8Path) -> CascadeResult<T>;

    /// Convert the error into [`CascadeError::Extract`] for the node at
    /// `path`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error when the input is `Err`.
    fn extract_at(self, path: &str) -> CascadeResult<T>
    where
        Self: Sized;
}

impl<T, E> CascadeResultExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn load_failure_at(self, path: &Utf8Path) -> CascadeResult<T> {
        self.map_err(|e| CascadeError::load_failure(path, e))
    }

    fn extract_at(self, path: &str) -> CascadeResult<T> {
        self.map_err(|e| {
            let boxed: Box<dyn std::error::Error + Send + Sync> = e.into();
            let source = match boxed.downcast::<serde_json::Error>() {
                Ok(json) => *json,
                Err(other) => serde::de::Error::custom(other.to_string()),
            };
            std::sync::Arc::new(CascadeError::Extract {
                path: path.to_owned(),
                source,
            })
        })
    }
}
