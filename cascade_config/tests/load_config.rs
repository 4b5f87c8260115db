//! End-to-end tests for `load`: directories, guard and freeze policy.

mod support;

use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use cascade_config::env::EmptyEnv;
use cascade_config::{CascadeError, LoadOptions, LoadedConfig, load};
use rstest::rstest;
use serde_json::json;
use support::{fixture_dir, ok};
use test_helpers::figment::{figment_error, with_jail};
use test_helpers::fragments::{FragmentDir, write_fragments};

fn load_environment_fixture(options: LoadOptions) -> Result<LoadedConfig> {
    ok(load(
        options
            .config_dir(fixture_dir("environment"))
            .env(EmptyEnv),
    ))
}

#[rstest]
fn missing_default_directory_is_reported() -> Result<()> {
    let err = with_jail(|_| {
        load(LoadOptions::new())
            .err()
            .ok_or_else(|| figment_error("expected load without ./config to fail"))
    })?;
    ensure!(err.is_not_found(), "expected NotFound, got {err:?}");
    let message = err.to_string();
    ensure!(
        message.contains("config/default\" not found with any extension: toml, json"),
        "unexpected message {message}"
    );
    Ok(())
}

#[rstest]
fn loads_from_working_directory_by_default() -> Result<()> {
    let loaded = with_jail(|jail| {
        write_fragments(jail, "config", &[("default.toml", "x = 1")])?;
        jail.set_env("APP_ENV", "production");
        write_fragments(jail, "config", &[("production.toml", "y = 2")])?;
        load(LoadOptions::new()).map_err(|err| figment_error(&*err))
    })?;
    ensure!(
        loaded.unsecure_config == json!({"x": 1, "y": 2}),
        "unexpected config {}",
        loaded.unsecure_config
    );
    Ok(())
}

#[rstest]
fn loads_default_fragment() -> Result<()> {
    let loaded = load_environment_fixture(LoadOptions::new())?;
    let config = &loaded.config;
    ensure!(ok(config.at("shallow"))?.as_str() == Some("shallow"), "shallow");
    ensure!(ok(config.at("nested.n1"))?.as_str() == Some("nested1"), "n1");
    ensure!(ok(config.at("nested.n2"))?.as_str() == Some("nested2"), "n2");
    Ok(())
}

#[rstest]
fn environment_fragment_overrides_default() -> Result<()> {
    let loaded = load_environment_fixture(LoadOptions::new().environment("production"))?;
    ensure!(
        loaded.unsecure_config
            == json!({
                "shallow": "shallow-production",
                "nested": {"n1": "nested1-production", "n2": "nested2-production"},
            }),
        "unexpected config {}",
        loaded.unsecure_config
    );
    Ok(())
}

#[rstest]
fn later_directories_win_per_key() -> Result<()> {
    let loaded = ok(load(
        LoadOptions::new()
            .config_dirs([fixture_dir("environment"), fixture_dir("manyExtensions")])
            .environment("production")
            .env(EmptyEnv),
    ))?;
    ensure!(
        loaded.unsecure_config
            == json!({
                "shallow": "shallowInToml",
                "nested": {"n1": "nested1-production", "n2": "nested2-production"},
            }),
        "unexpected config {}",
        loaded.unsecure_config
    );
    Ok(())
}

#[rstest]
fn every_directory_needs_a_default_fragment() -> Result<()> {
    let empty = FragmentDir::new()?;
    let result = load(
        LoadOptions::new()
            .config_dirs([fixture_dir("environment"), empty.path().to_path_buf()])
            .env(EmptyEnv),
    );
    ensure!(
        result.as_ref().is_err_and(|err| err.is_not_found()),
        "expected NotFound for the empty directory"
    );
    Ok(())
}

#[rstest]
#[case(true)]
#[case(false)]
fn undefined_reads_follow_throw_option(#[case] throw: bool) -> Result<()> {
    let loaded = load_environment_fixture(LoadOptions::new().throw_on_undefined_prop(throw))?;
    let read = loaded.config.get("undefinedProperty");
    if throw {
        let message = read.err().map(|err| err.to_string());
        ensure!(
            message.as_deref() == Some("Property undefinedProperty is not defined in the config"),
            "unexpected outcome {message:?}"
        );
    } else {
        let view = ok(read)?;
        ensure!(!view.is_defined(), "expected an undefined view");
    }
    ensure!(loaded.config.is_guarded() == throw, "guard flag mismatch");
    Ok(())
}

#[rstest]
#[case(true)]
#[case(false)]
fn writes_follow_freeze_option(#[case] freeze: bool) -> Result<()> {
    let mut loaded = load_environment_fixture(LoadOptions::new().freeze_config(freeze))?;
    let result = loaded.config.set("shallow", json!("modified"));
    if freeze {
        let Err(err) = result else {
            anyhow::bail!("expected a frozen config to reject writes");
        };
        ensure!(
            err.to_string()
                .contains("Cannot assign to read only property 'shallow'"),
            "unexpected message {err}"
        );
    } else {
        ok(result)?;
        ensure!(
            ok(loaded.config.at("shallow"))?.as_str() == Some("modified"),
            "write not applied"
        );
    }
    Ok(())
}

#[rstest]
fn frozen_write_reports_frozen_before_guard() -> Result<()> {
    let mut loaded = load_environment_fixture(LoadOptions::new())?;
    let Err(err) = loaded.config.set("absent.key", json!(1)) else {
        anyhow::bail!("expected write to fail");
    };
    ensure!(
        matches!(err.as_ref(), CascadeError::Frozen { .. }),
        "expected Frozen, got {err:?}"
    );
    Ok(())
}

#[rstest]
fn single_fragment_round_trip() -> Result<()> {
    let dir = FragmentDir::with_files(&[("default.toml", "x = 1")])?;
    let mut loaded = ok(load(LoadOptions::new().config_dir(dir.path()).env(EmptyEnv)))?;
    ensure!(ok(loaded.config.get("x"))?.as_i64() == Some(1), "x should be 1");
    ensure!(loaded.config.get("y").is_err(), "y should be undefined");
    ensure!(
        loaded.config.set("x", json!(2)).is_err_and(|err| err.is_frozen()),
        "config should be frozen"
    );
    ensure!(loaded.unsecure_config.get("y").is_none(), "y should be absent");
    loaded.unsecure_config["x"] = json!(2);
    ensure!(
        ok(loaded.config.get("x"))?.as_i64() == Some(1),
        "unsecure copy must be independent"
    );
    Ok(())
}

#[rstest]
fn environment_comes_from_injected_lookup() -> Result<()> {
    let env = BTreeMap::from([("APP_ENV".to_owned(), "production".to_owned())]);
    let loaded = ok(load(
        LoadOptions::new()
            .config_dir(fixture_dir("environment"))
            .env(env),
    ))?;
    ensure!(
        ok(loaded.config.at("shallow"))?.as_str() == Some("shallow-production"),
        "APP_ENV should select production"
    );
    Ok(())
}

#[cfg(unix)]
#[rstest]
fn default_fragment_linked_from_another_directory_loads() -> Result<()> {
    let mount = FragmentDir::with_files(&[("app.toml", "x = 1")])?;
    let config = FragmentDir::new()?;
    std::os::unix::fs::symlink(mount.path().join("app.toml"), config.path().join("default.toml"))?;
    let loaded = ok(load(
        LoadOptions::new()
            .config_dir(config.path())
            .without_environment()
            .env(EmptyEnv),
    ))?;
    ensure!(
        loaded.unsecure_config == json!({"x": 1}),
        "unexpected config {}",
        loaded.unsecure_config
    );
    Ok(())
}
