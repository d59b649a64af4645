// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::Config;

/// Compiled watch/exclude glob patterns for the app file set.
///
/// Patterns are assumed to be relative to the project root. The watcher
/// passes relative paths (e.g. `"client/app.js"`) into `matches`.
#[derive(Clone)]
pub struct WatchProfile {
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile").finish_non_exhaustive()
    }
}

impl WatchProfile {
    /// Returns true if the given path (relative to project root) belongs to
    /// the watched app file set.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build the compiled watch profile from a validated config.
///
/// The bundle output file is always excluded: the build task writes it into
/// the served directory, and watching it would retrigger the build on every
/// rebuild.
pub fn build_watch_profile(cfg: &Config) -> Result<WatchProfile> {
    let watch_set =
        build_globset(&cfg.paths().app).context("building watch globset")?;

    let exclude_patterns = vec![cfg.bundle_output_rel()];
    let exclude_set = Some(
        build_globset(&exclude_patterns).context("building exclude globset")?,
    );

    Ok(WatchProfile {
        watch_set,
        exclude_set,
    })
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
