//! Writers for configuration fragment files.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A scratch configuration directory removed on drop.
///
/// # Examples
///
/// ```
/// use test_helpers::fragments::FragmentDir;
///
/// let dir = FragmentDir::with_files(&[("default.toml", "port = 1")])?;
/// assert!(dir.path().join("default.toml").is_file());
/// # Ok::<_, anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct FragmentDir {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl FragmentDir {
    /// Create an empty scratch directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or its path is
    /// not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create fragment directory")?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temporary path is not UTF-8: {}", path.display()))?;
        Ok(Self { _dir: dir, path })
    }

    /// Create a scratch directory holding `files`, given as
    /// `(file name, contents)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or any file cannot be written.
    pub fn with_files(files: &[(&str, &str)]) -> Result<Self> {
        let dir = Self::new()?;
        for (name, contents) in files {
            dir.write(name, contents)?;
        }
        Ok(dir)
    }

    /// Path of the directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `contents` to `file_name` inside the directory, replacing any
    /// existing file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn write(&self, file_name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let target = self.path.join(file_name);
        std::fs::write(&target, contents).with_context(|| format!("write {target}"))?;
        Ok(target)
    }
}

/// Write `files` into `dir` relative to the jail's working directory,
/// creating the directory first.
///
/// # Errors
///
/// Returns the jail's error when a directory or file cannot be created.
pub fn write_fragments(
    jail: &mut figment::Jail,
    dir: &str,
    files: &[(&str, &str)],
) -> figment::error::Result<Utf8PathBuf> {
    jail.create_dir(dir)?;
    for (name, contents) in files {
        jail.create_file(format!("{dir}/{name}"), contents)?;
    }
    Ok(Utf8PathBuf::from(dir))
}
