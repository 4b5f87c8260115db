//! TOML fragments with environment interpolation.

use camino::Utf8Path;
use serde_json::{Map, Number, Value};

use super::FileLoader;
use crate::env::EnvLookup;
use crate::file::error::invalid_data;
use crate::file::helpers::is_blank;
use crate::file::interpolate::interpolate;
use crate::{CascadeResult, CascadeResultExt};

/// Loader for `.toml` fragments.
///
/// String values may reference environment variables as `${NAME}` or
/// `${NAME:-fallback}`; they are expanded every time the file is loaded. A
/// value that references an unset variable without a fallback is dropped, so
/// the key is absent from the fragment.
///
/// Datetimes load as their RFC 3339 text.
///
/// ```toml
/// [database]
/// url = "${DATABASE_URL}"
/// pool = "${DATABASE_POOL:-4}"
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlLoader;

impl FileLoader for TomlLoader {
    fn extensions(&self) -> &[&str] {
        &["toml"]
    }

    fn evaluates_environment(&self) -> bool {
        true
    }

    fn parse(
        &self,
        path: &Utf8Path,
        contents: &str,
        env: &dyn EnvLookup,
    ) -> CascadeResult<Option<Value>> {
        if is_blank(contents) {
            return Ok(None);
        }
        let table = ::toml::from_str::<::toml::Table>(contents).load_failure_at(path)?;
        let document = table_to_json(table, path)?;
        interpolate(document, env, path)
    }
}

fn table_to_json(table: ::toml::Table, path: &Utf8Path) -> CascadeResult<Value> {
    table
        .into_iter()
        .map(|(key, item)| Ok((key, to_json(item, path)?)))
        .collect::<CascadeResult<Map<String, Value>>>()
        .map(Value::Object)
}

fn to_json(value: ::toml::Value, path: &Utf8Path) -> CascadeResult<Value> {
    Ok(match value {
        ::toml::Value::String(text) => Value::String(text),
        ::toml::Value::Integer(int) => Value::from(int),
        ::toml::Value::Float(float) => Number::from_f64(float)
            .map(Value::Number)
            .ok_or_else(|| invalid_data(path, format!("float {float} has no JSON form")))?,
        ::toml::Value::Boolean(flag) => Value::Bool(flag),
        ::toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        ::toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| to_json(item, path))
                .collect::<CascadeResult<_>>()?,
        ),
        ::toml::Value::Table(table) => table_to_json(table, path)?,
    })
}
