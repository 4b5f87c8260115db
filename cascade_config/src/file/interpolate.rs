//! Environment interpolation for string values.
//!
//! Placeholders use shell-like syntax:
//!
//! - `${NAME}` expands to the value of `NAME`;
//! - `${NAME:-fallback}` expands to `fallback` when `NAME` is unset;
//! - `$$` is a literal `$`.
//!
//! A string containing a placeholder for an unset variable without a
//! fallback has no value. Its key is removed from the enclosing mapping, or
//! its element from the enclosing array, so the merge treats it as absent.

use std::sync::LazyLock;

use camino::Utf8Path;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::CascadeResult;
use crate::env::EnvLookup;

use super::error::invalid_data;

static PLACEHOLDER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\$(?:\$|\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\})"));

/// Expand environment placeholders in every string of `value`.
///
/// Returns `Ok(None)` when `value` itself is a string that cannot be
/// expanded.
///
/// # Errors
///
/// Returns a [`crate::CascadeError::LoadFailure`] for `path` if the
/// placeholder pattern cannot be compiled.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8Path;
/// use cascade_config::file::interpolate;
/// use serde_json::json;
/// use std::collections::BTreeMap;
///
/// let env = BTreeMap::from([("HOST".to_owned(), "db.internal".to_owned())]);
/// let value = json!({"url": "postgres://${HOST}/app", "user": "${DB_USER}"});
/// let out = interpolate(value, &env, Utf8Path::new("default.toml"))?;
/// assert_eq!(out, Some(json!({"url": "postgres://db.internal/app"})));
/// # Ok::<_, std::sync::Arc<cascade_config::CascadeError>>(())
/// ```
pub fn interpolate(
    value: Value,
    env: &dyn EnvLookup,
    path: &Utf8Path,
) -> CascadeResult<Option<Value>> {
    let pattern = PLACEHOLDER
        .as_ref()
        .map_err(|err| invalid_data(path, format!("invalid placeholder pattern: {err}")))?;
    Ok(expand_value(value, env, pattern))
}

fn expand_value(value: Value, env: &dyn EnvLookup, pattern: &Regex) -> Option<Value> {
    match value {
        Value::String(text) => expand_str(&text, env, pattern).map(Value::String),
        Value::Array(items) => Some(Value::Array(
            items
                .into_iter()
                .filter_map(|item| expand_value(item, env, pattern))
                .collect(),
        )),
        Value::Object(map) => Some(Value::Object(
            map.into_iter()
                .filter_map(|(key, item)| expand_value(item, env, pattern).map(|v| (key, v)))
                .collect::<Map<String, Value>>(),
        )),
        other => Some(other),
    }
}

fn expand_str(text: &str, env: &dyn EnvLookup, pattern: &Regex) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let whole = caps.get(0)?;
        out.push_str(text.get(last..whole.start())?);
        out.push_str(&resolve(&caps, env)?);
        last = whole.end();
    }
    out.push_str(text.get(last..)?);
    Some(out)
}

fn resolve(caps: &Captures<'_>, env: &dyn EnvLookup) -> Option<String> {
    let Some(name) = caps.get(1) else {
        return Some("$".to_owned());
    };
    env.var(name.as_str())
        .or_else(|| caps.get(2).map(|fallback| fallback.as_str().to_owned()))
}
