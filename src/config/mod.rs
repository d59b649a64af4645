// src/config/mod.rs

//! Configuration loading and validation.
//!
//! The flow mirrors the data model: TOML -> [`RawConfig`] (pure serde) ->
//! [`Config`] (validated via `TryFrom`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_builtin};
pub use model::{BundleSection, Config, PathsSection, RawConfig, RuleConfig, ServerSection};
