// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{Config, RawConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (rule disjointness, etc.). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - structurally invalid globs,
///   - overlapping or unknown transform rules,
///   - basic server/bundle sanity (port, single output filename).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = load_from_path(&path)?;
    let config = Config::try_from(raw_config)?;
    Ok(config)
}

/// Load the config at `path` if it exists, otherwise fall back to the
/// built-in defaults (the canonical `client/` layout).
pub fn load_or_builtin(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if path.exists() {
        load_and_validate(path)
    } else {
        tracing::debug!(?path, "no config file found, using built-in defaults");
        Config::builtin()
    }
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Devloop.toml` in the current working
/// directory, but this function exists so you can later:
///
/// - Respect an env var (e.g. `DEVLOOP_CONFIG`).
/// - Support project-local config discovery.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Devloop.toml")
}
