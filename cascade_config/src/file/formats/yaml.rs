//! YAML fragments backed by `serde-saphyr`.

use camino::Utf8Path;
use serde_json::Value;
use serde_saphyr::Options;

use super::FileLoader;
use crate::env::EnvLookup;
use crate::file::helpers::is_blank;
use crate::{CascadeResult, CascadeResultExt};

/// Loader for `.yaml` and `.yml` fragments, parsed with strict boolean
/// semantics.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlLoader;

impl FileLoader for YamlLoader {
    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn parse(
        &self,
        path: &Utf8Path,
        contents: &str,
        _env: &dyn EnvLookup,
    ) -> CascadeResult<Option<Value>> {
        if is_blank(contents) {
            return Ok(None);
        }
        let document: Value = serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
        .load_failure_at(path)?;
        Ok(Some(document).filter(|value| !value.is_null()))
    }
}
