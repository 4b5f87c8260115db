//! Primary error enum for configuration loading and access.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CascadeError {
    /// A required fragment has no backing file under any candidate extension.
    #[error("Config file \"{base_path}\" not found with any extension: {extensions}")]
    NotFound {
        /// Fragment path without an extension.
        base_path: Utf8PathBuf,
        /// Comma-separated list of the extensions that were probed.
        extensions: String,
    },

    /// A fragment file exists but could not be read or parsed.
    #[error("Failed to load config file \"{path}\": {source}")]
    LoadFailure {
        /// File that failed to load.
        path: Utf8PathBuf,
        /// Underlying error reported by the reader or parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A fragment file was selected but no loader handles its extension.
    #[error("Config file \"{path}\" has extension \"{extension}\" but no loader is registered for it")]
    UnsupportedExtension {
        /// File that was selected.
        path: Utf8PathBuf,
        /// Extension without a registered loader.
        extension: String,
    },

    /// A fragment file loaded but exposes neither a `config` entry nor a
    /// default export.
    #[error("Config file \"{path}\" has no default export and does not have export \"config\"")]
    ExportMissing {
        /// File that was loaded.
        path: Utf8PathBuf,
    },

    /// A guarded read targeted a property that is not present.
    #[error("Property {property} is not defined in the config")]
    UndefinedProperty {
        /// Key or index that was requested.
        property: String,
        /// Path of the node the read was performed on.
        path: String,
    },

    /// A write targeted a frozen configuration.
    #[error("Cannot assign to read only property '{path}' of frozen config")]
    Frozen {
        /// Path that the write targeted.
        path: String,
    },

    /// A write could not be applied because the path crosses a non-mapping.
    #[error("Cannot write to '{path}': {message}")]
    InvalidPath {
        /// Path that the write targeted.
        path: String,
        /// Human-readable reason.
        message: String,
    },

    /// Typed extraction of a configuration node failed.
    #[error("Failed to extract config at '{path}': {source}")]
    Extract {
        /// Path of the node being extracted.
        path: String,
        /// Deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The default configuration directory could not be derived.
    #[error("Failed to determine the default config directory: {source}")]
    WorkingDirectory {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
