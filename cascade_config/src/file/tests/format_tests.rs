//! Built-in parsers and the loader registry.

use std::sync::Arc;

use anyhow::{Result, ensure};
use camino::Utf8Path;
use rstest::rstest;
use serde_json::{Value, json};

use super::{load_fragment, to_anyhow, with_jail};
use crate::CascadeResult;
use crate::env::{EmptyEnv, EnvLookup};
use crate::file::{FileLoader, JsonLoader, LoaderRegistry, TomlLoader};

#[derive(Debug)]
struct UpperJsonLoader;

impl FileLoader for UpperJsonLoader {
    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(
        &self,
        path: &Utf8Path,
        contents: &str,
        env: &dyn EnvLookup,
    ) -> CascadeResult<Option<Value>> {
        let parsed = JsonLoader.parse(path, &contents.to_uppercase(), env)?;
        Ok(parsed)
    }
}

#[rstest]
fn toml_tables_become_nested_mappings() -> Result<()> {
    let parsed = to_anyhow(TomlLoader.parse(
        Utf8Path::new("default.toml"),
        "[server]\nport = 8080\nhosts = [\"a\", \"b\"]\n",
        &EmptyEnv,
    ))?;
    ensure!(
        parsed == Some(json!({"server": {"port": 8080, "hosts": ["a", "b"]}})),
        "unexpected TOML document {parsed:?}"
    );
    Ok(())
}

#[rstest]
#[case("when = 1979-05-27T07:32:00Z", "1979-05-27T07:32:00Z")]
#[case("when = 1979-05-27T00:32:00.999999-07:00", "1979-05-27T00:32:00.999999-07:00")]
#[case("when = 1979-05-27", "1979-05-27")]
#[case("when = 07:32:00", "07:32:00")]
fn toml_datetimes_load_as_text(#[case] contents: &str, #[case] expected: &str) -> Result<()> {
    let parsed = to_anyhow(TomlLoader.parse(Utf8Path::new("default.toml"), contents, &EmptyEnv))?;
    ensure!(
        parsed == Some(json!({"when": expected})),
        "expected datetime text {expected}, got {parsed:?}"
    );
    Ok(())
}

#[rstest]
fn toml_datetimes_in_nested_tables_and_arrays() -> Result<()> {
    let parsed = to_anyhow(TomlLoader.parse(
        Utf8Path::new("default.toml"),
        "[release]
dates = [2024-01-01, 2024-06-30]
",
        &EmptyEnv,
    ))?;
    ensure!(
        parsed == Some(json!({"release": {"dates": ["2024-01-01", "2024-06-30"]}})),
        "unexpected nested datetimes {parsed:?}"
    );
    Ok(())
}

#[rstest]
fn non_finite_toml_float_is_a_load_failure() -> Result<()> {
    let result = TomlLoader.parse(Utf8Path::new("default.toml"), "ratio = nan", &EmptyEnv);
    let Err(err) = result else {
        anyhow::bail!("expected nan to be rejected");
    };
    ensure!(
        err.to_string().contains("default.toml"),
        "error should name the file: {err}"
    );
    Ok(())
}

#[rstest]
#[case("default.toml", "port = ")]
#[case("default.toml", "[server\nport = 1")]
fn malformed_toml_is_a_load_failure(#[case] path: &str, #[case] contents: &str) -> Result<()> {
    let result = TomlLoader.parse(Utf8Path::new(path), contents, &EmptyEnv);
    let Err(err) = result else {
        anyhow::bail!("expected malformed TOML to fail");
    };
    ensure!(
        err.to_string().contains(path),
        "error should name the file: {err}"
    );
    Ok(())
}

#[rstest]
#[case("")]
#[case("  \n\t")]
#[case("null")]
fn json_without_document_exports_nothing(#[case] contents: &str) -> Result<()> {
    let parsed = to_anyhow(JsonLoader.parse(Utf8Path::new("default.json"), contents, &EmptyEnv))?;
    ensure!(parsed.is_none(), "expected no export, got {parsed:?}");
    Ok(())
}

#[rstest]
fn json_strings_are_not_interpolated() -> Result<()> {
    let env = std::collections::BTreeMap::from([("HOST".to_owned(), "db".to_owned())]);
    let parsed = to_anyhow(JsonLoader.parse(
        Utf8Path::new("default.json"),
        r#"{"host": "${HOST}"}"#,
        &env,
    ))?;
    ensure!(
        parsed == Some(json!({"host": "${HOST}"})),
        "JSON should be static, got {parsed:?}"
    );
    Ok(())
}

#[rstest]
#[case("toml", true)]
#[case("TOML", true)]
#[case("json", false)]
#[case("ini", false)]
fn registry_reports_environment_capable_formats(
    #[case] extension: &str,
    #[case] expected: bool,
) -> Result<()> {
    let registry = LoaderRegistry::default();
    ensure!(
        registry.evaluates_environment(extension) == expected,
        "unexpected capability for {extension}"
    );
    Ok(())
}

#[rstest]
fn environment_extensions_keep_caller_order() -> Result<()> {
    let registry = LoaderRegistry::default();
    let filtered = registry.environment_extensions(&["json", "toml", "yaml", "toml"]);
    ensure!(filtered == ["toml", "toml"], "unexpected filter {filtered:?}");
    Ok(())
}

#[rstest]
fn empty_registry_handles_nothing() -> Result<()> {
    let registry = LoaderRegistry::empty();
    ensure!(registry.loader_for("toml").is_none(), "empty registry found toml");
    ensure!(registry.extensions().is_empty(), "empty registry lists extensions");
    Ok(())
}

#[rstest]
fn later_registration_overrides_builtin() -> Result<()> {
    with_jail(|jail| {
        jail.create_file("default.json", r#"{"name": "value"}"#)?;
        let registry = LoaderRegistry::default().with_loader(Arc::new(UpperJsonLoader));
        let extensions = super::extensions(&["json"]);
        let loader = crate::file::FragmentLoader::new(&registry, &EmptyEnv);
        let value = to_anyhow(loader.load(&crate::file::FragmentRequest {
            base_path: Utf8Path::new("default"),
            extensions: &extensions,
            required: true,
        }))?;
        ensure!(value == json!({"NAME": "VALUE"}), "override not used: {value}");
        let builtin = to_anyhow(load_fragment("default", &["json"], true))?;
        ensure!(builtin == json!({"name": "value"}), "builtin changed: {builtin}");
        Ok(())
    })
}
