// src/bundle/mod.rs

//! The build task: bundle the entry module into a single output file.
//!
//! Pipeline per build:
//! 1. [`rules`] — compile the `[[bundle.rule]]` list.
//! 2. [`graph`] — resolve the module graph from `[bundle].entry`.
//! 3. [`transform`] — turn each module's source into a module function body.
//! 4. [`emit`] — assemble the runtime and module map, write
//!    `base_dir/output`.

pub mod emit;
pub mod graph;
pub mod rules;
pub mod transform;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::Result;

pub use graph::{Module, ModuleGraph};
pub use rules::RuleSet;
pub use transform::Transform;

/// Summary of one completed build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output: PathBuf,
    pub modules: usize,
    pub bytes: usize,
}

/// Bundles the configured entry module and everything it reaches.
pub struct Bundler {
    root: PathBuf,
    config: Config,
    rules: RuleSet,
}

impl Bundler {
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let rules = RuleSet::from_config(config)?;
        Ok(Self {
            root: root.into(),
            config: config.clone(),
            rules,
        })
    }

    /// Resolve, transform and write the bundle.
    pub fn build(&self) -> Result<BuildReport> {
        let entry = self.config.bundle().entry.replace('\\', "/");
        debug!(entry = %entry, "resolving module graph");

        let graph = ModuleGraph::resolve(&self.root, &entry, &self.rules)?;
        let bundle = emit::emit_bundle(&graph)?;

        let output = self.root.join(self.config.bundle_output_rel());
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {:?}", parent))?;
        }
        fs::write(&output, &bundle)
            .with_context(|| format!("writing bundle to {:?}", output))?;

        info!(
            modules = graph.len(),
            bytes = bundle.len(),
            output = ?output,
            "bundle written"
        );

        Ok(BuildReport {
            output,
            modules: graph.len(),
            bytes: bundle.len(),
        })
    }
}
