//! Constructors and classification helpers for `CascadeError`.

use std::sync::Arc;

use camino::Utf8Path;

use super::CascadeError;

impl CascadeError {
    /// Construct a [`CascadeError::NotFound`] for `base_path`, joining the
    /// probed `extensions` in the order they were tried.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use cascade_config::CascadeError;
    /// let err = CascadeError::not_found(Utf8Path::new("config/default"), &["toml", "json"]);
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Config file \"config/default\" not found with any extension: toml, json"
    /// );
    /// ```
    #[must_use]
    pub fn not_found<S: AsRef<str>>(base_path: &Utf8Path, extensions: &[S]) -> Self {
        let joined: Vec<&str> = extensions.iter().map(AsRef::as_ref).collect();
        Self::NotFound {
            base_path: base_path.to_path_buf(),
            extensions: joined.join(", "),
        }
    }

    /// Construct a [`CascadeError::LoadFailure`] wrapped in an [`Arc`].
    #[must_use]
    pub fn load_failure(
        path: &Utf8Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::LoadFailure {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a [`CascadeError::ExportMissing`] wrapped in an [`Arc`].
    #[must_use]
    pub fn export_missing(path: &Utf8Path) -> Arc<Self> {
        Arc::new(Self::ExportMissing {
            path: path.to_path_buf(),
        })
    }

    /// Construct a [`CascadeError::UndefinedProperty`] wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade_config::CascadeError;
    /// let err = CascadeError::undefined_property("port", "server");
    /// assert_eq!(err.to_string(), "Property port is not defined in the config");
    /// ```
    #[must_use]
    pub fn undefined_property(property: impl Into<String>, path: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::UndefinedProperty {
            property: property.into(),
            path: path.into(),
        })
    }

    /// Construct a [`CascadeError::Frozen`] wrapped in an [`Arc`].
    #[must_use]
    pub fn frozen(path: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::Frozen { path: path.into() })
    }

    /// Construct a [`CascadeError::InvalidPath`] wrapped in an [`Arc`].
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        })
    }

    /// Returns `true` when the error reports a missing required fragment.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` when the error reports a guarded read of an absent
    /// property.
    #[must_use]
    pub const fn is_undefined_property(&self) -> bool {
        matches!(self, Self::UndefinedProperty { .. })
    }

    /// Returns `true` when the error reports a write to a frozen config.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen { .. })
    }
}
