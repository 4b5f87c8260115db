//! Load a configuration directory and print the merged result as JSON.
//!
//! ```text
//! APP_ENV=production cargo run --example print_config -- path/to/config server.port
//! ```
//!
//! The first argument is the configuration directory (default `./config`).
//! An optional second argument is a dotted path to print instead of the
//! whole configuration; reading a path that is not defined fails.

use std::io::{self, Write};

use anyhow::{Context, Result, anyhow};
use cascade_config::{LoadOptions, load};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut options = LoadOptions::new();
    if let Some(dir) = args.next() {
        options = options.config_dir(dir);
    }
    let loaded = load(options).map_err(|err| anyhow!(err.to_string()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.next() {
        Some(path) => {
            let view = loaded
                .config
                .at(&path)
                .map_err(|err| anyhow!(err.to_string()))?;
            serde_json::to_writer_pretty(&mut out, &view).context("write value")?;
        }
        None => serde_json::to_writer_pretty(&mut out, &loaded.config).context("write config")?,
    }
    writeln!(out).context("write newline")?;
    Ok(())
}
