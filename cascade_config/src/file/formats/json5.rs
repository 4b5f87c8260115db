//! JSON5 fragments backed by `figment-json5`.

use camino::Utf8Path;
use figment::providers::Format;
use figment_json5::Json5;
use serde_json::Value;

use super::FileLoader;
use crate::env::EnvLookup;
use crate::file::helpers::is_blank;
use crate::{CascadeResult, CascadeResultExt};

/// Loader for `.json5` fragments.
#[derive(Clone, Copy, Debug, Default)]
pub struct Json5Loader;

impl FileLoader for Json5Loader {
    fn extensions(&self) -> &[&str] {
        &["json5"]
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
        let document = Json5::from_str::<Value>(contents).load_failure_at(path)?;
        Ok(Some(document).filter(|value| !value.is_null()))
    }
}
