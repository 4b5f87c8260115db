//! Error constructors shared by fragment loading helpers.

use std::sync::Arc;

use camino::Utf8Path;

use crate::CascadeError;

/// Construct a [`CascadeError::LoadFailure`] carrying an I/O error of `kind`.
pub(super) fn io_failure(
    path: &Utf8Path,
    kind: std::io::ErrorKind,
    msg: impl Into<String>,
) -> Arc<CascadeError> {
    CascadeError::load_failure(path, std::io::Error::new(kind, msg.into()))
}

pub(super) fn invalid_data(path: &Utf8Path, msg: impl Into<String>) -> Arc<CascadeError> {
    io_failure(path, std::io::ErrorKind::InvalidData, msg)
}

pub(super) fn unsupported_extension(path: &Utf8Path, extension: &str) -> Arc<CascadeError> {
    Arc::new(CascadeError::UnsupportedExtension {
        path: path.to_path_buf(),
        extension: extension.to_owned(),
    })
}
