//! Static JSON fragments.

use camino::Utf8Path;
use serde_json::Value;

use super::FileLoader;
use crate::env::EnvLookup;
use crate::file::helpers::is_blank;
use crate::{CascadeResult, CascadeResultExt};

/// Loader for `.json` fragments.
///
/// JSON is data only: values are taken verbatim and never computed from the
/// environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonLoader;

impl FileLoader for JsonLoader {
    fn extensions(&self) -> &[&str] {
        &["json"]
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
        let document: Value = serde_json::from_str(contents).load_failure_at(path)?;
        Ok(Some(document).filter(|value| !value.is_null()))
    }
}
