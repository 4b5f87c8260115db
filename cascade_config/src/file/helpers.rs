//! Filesystem helpers for fragment loading.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Path of the file backing `base_path` with `extension`.
///
/// The extension is appended rather than substituted so base names that
/// contain dots keep their full name.
pub(super) fn candidate_path(base_path: &Utf8Path, extension: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{base_path}.{extension}"))
}

/// Read the file at `path` after following any symlinks to their target.
///
/// Only the resolved target's directory is opened, so fragments linked in
/// from elsewhere on disk read the same as regular files.
///
/// # Errors
///
/// Returns an [`std::io::Error`] when the path cannot be resolved, its
/// directory cannot be opened, or the file cannot be read as UTF-8.
pub(super) fn read_resolved(path: &Utf8Path) -> std::io::Result<String> {
    let resolved = path.canonicalize_utf8()?;
    let (Some(parent), Some(name)) = (resolved.parent(), resolved.file_name()) else {
        return Err(std::io::Error::other(format!(
            "{resolved} does not name a file inside a directory"
        )));
    };
    Dir::open_ambient_dir(parent, ambient_authority())?.read_to_string(name)
}

/// Returns `true` when `contents` holds nothing but whitespace.
pub(super) fn is_blank(contents: &str) -> bool {
    contents.trim().is_empty()
}
