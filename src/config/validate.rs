// src/config/validate.rs

use std::collections::BTreeSet;

use globset::Glob;

use crate::bundle::transform::Transform;
use crate::config::model::{Config, RawConfig, RuleConfig};
use crate::errors::{DevloopError, Result};

impl TryFrom<RawConfig> for Config {
    type Error = crate::errors::DevloopError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(Config::new_unchecked(raw.paths, raw.server, raw.bundle))
    }
}

fn validate_raw_config(cfg: &RawConfig) -> Result<()> {
    validate_paths(cfg)?;
    validate_server(cfg)?;
    validate_bundle(cfg)?;
    Ok(())
}

fn validate_paths(cfg: &RawConfig) -> Result<()> {
    if cfg.paths.source.is_empty() {
        return Err(DevloopError::ConfigError(
            "[paths].source must not be empty".to_string(),
        ));
    }
    if cfg.paths.app.is_empty() {
        return Err(DevloopError::ConfigError(
            "[paths].app must contain at least one glob pattern".to_string(),
        ));
    }
    for pat in cfg.paths.app.iter() {
        compile_glob(pat)?;
    }
    Ok(())
}

fn validate_server(cfg: &RawConfig) -> Result<()> {
    if cfg.server.port == 0 {
        return Err(DevloopError::ConfigError(
            "[server].port must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.server.base_dir.is_empty() {
        return Err(DevloopError::ConfigError(
            "[server].base_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_bundle(cfg: &RawConfig) -> Result<()> {
    if cfg.bundle.entry.is_empty() {
        return Err(DevloopError::ConfigError(
            "[bundle].entry must not be empty".to_string(),
        ));
    }
    validate_output_filename(&cfg.bundle.output)?;

    if cfg.bundle.rules.is_empty() {
        return Err(DevloopError::ConfigError(
            "[bundle] must declare at least one [[bundle.rule]]".to_string(),
        ));
    }

    for rule in cfg.bundle.rules.iter() {
        validate_rule(rule)?;
    }
    validate_rules_disjoint(&cfg.bundle.rules)?;
    validate_entry_has_rule(cfg)?;
    Ok(())
}

/// The output must be exactly one bare filename; it is always written into
/// `[server].base_dir`, never to an arbitrary path.
fn validate_output_filename(output: &str) -> Result<()> {
    if output.is_empty() {
        return Err(DevloopError::ConfigError(
            "[bundle].output must not be empty".to_string(),
        ));
    }
    if output.contains('/') || output.contains('\\') {
        return Err(DevloopError::ConfigError(format!(
            "[bundle].output must be a bare filename, got '{output}'"
        )));
    }
    Ok(())
}

fn validate_rule(rule: &RuleConfig) -> Result<()> {
    compile_glob(&rule.pattern)?;
    for pat in rule.exclude.iter() {
        compile_glob(pat)?;
    }
    if rule.steps.is_empty() {
        return Err(DevloopError::ConfigError(format!(
            "rule '{}' must name at least one transform in `use`",
            rule.pattern
        )));
    }
    for step in rule.steps.iter() {
        if Transform::parse(step).is_none() {
            return Err(DevloopError::ConfigError(format!(
                "rule '{}' uses unknown transform '{}' (known: {})",
                rule.pattern,
                step,
                Transform::KNOWN_NAMES.join(", ")
            )));
        }
    }
    Ok(())
}

/// Every rule must target a disjoint file-extension class, so that exactly
/// one rule can ever claim a given module.
fn validate_rules_disjoint(rules: &[RuleConfig]) -> Result<()> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    for rule in rules {
        for ext in rule_extension_class(&rule.pattern)? {
            if !seen.insert(ext.clone()) {
                return Err(DevloopError::ConfigError(format!(
                    "rules overlap: extension '.{ext}' is claimed by more than one [[bundle.rule]]"
                )));
            }
        }
    }
    Ok(())
}

/// Extract the extension class a rule pattern targets.
///
/// Accepts `*.js`, `**/*.js` and brace sets like `*.{js,jsx}`. A pattern
/// without an extension suffix cannot be checked for disjointness and is
/// rejected.
fn rule_extension_class(pattern: &str) -> Result<Vec<String>> {
    let tail = pattern.rsplit('/').next().unwrap_or(pattern);
    let Some((_, ext)) = tail.rsplit_once('.') else {
        return Err(DevloopError::ConfigError(format!(
            "rule pattern '{pattern}' must target a file extension class (e.g. `*.js`)"
        )));
    };

    let exts: Vec<String> = if ext.starts_with('{') && ext.ends_with('}') {
        ext[1..ext.len() - 1]
            .split(',')
            .map(|s| s.trim().to_string())
            .collect()
    } else {
        vec![ext.to_string()]
    };

    for e in exts.iter() {
        if e.is_empty() || !e.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DevloopError::ConfigError(format!(
                "rule pattern '{pattern}' has an invalid extension class '.{e}'"
            )));
        }
    }

    Ok(exts)
}

/// The entry module must be claimed by some rule, otherwise the very first
/// build would fail.
fn validate_entry_has_rule(cfg: &RawConfig) -> Result<()> {
    let entry = cfg.bundle.entry.replace('\\', "/");
    for rule in cfg.bundle.rules.iter() {
        let glob = compile_glob(&rule.pattern)?;
        if glob.compile_matcher().is_match(&entry) {
            return Ok(());
        }
    }
    Err(DevloopError::ConfigError(format!(
        "[bundle].entry '{}' is not matched by any [[bundle.rule]] pattern",
        cfg.bundle.entry
    )))
}

fn compile_glob(pattern: &str) -> Result<Glob> {
    Glob::new(pattern)
        .map_err(|e| DevloopError::ConfigError(format!("invalid glob pattern '{pattern}': {e}")))
}
