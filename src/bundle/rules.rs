// src/bundle/rules.rs

//! Compiled transform rules.
//!
//! Rules are matched in declaration order; the first rule whose pattern
//! matches a module's project-relative path claims it. Config validation
//! guarantees the rule patterns target disjoint extension classes, so order
//! only matters for error messages in practice.

use anyhow::{Context, Result, anyhow};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::bundle::transform::Transform;
use crate::config::Config;

/// One compiled `[[bundle.rule]]`.
#[derive(Debug)]
pub struct LoaderRule {
    pattern: GlobMatcher,
    exclude: Option<GlobSet>,
    chain: Vec<Transform>,
}

impl LoaderRule {
    fn matches(&self, rel_path: &str) -> bool {
        self.pattern.is_match(rel_path)
    }

    fn excluded(&self, rel_path: &str) -> bool {
        self.exclude
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }

    pub fn chain(&self) -> &[Transform] {
        &self.chain
    }
}

/// The full ordered rule list from the config.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<LoaderRule>,
}

impl RuleSet {
    pub fn from_config(cfg: &Config) -> Result<RuleSet> {
        let mut rules = Vec::with_capacity(cfg.bundle().rules.len());

        for rule_cfg in cfg.bundle().rules.iter() {
            let pattern = Glob::new(&rule_cfg.pattern)
                .with_context(|| format!("compiling rule pattern '{}'", rule_cfg.pattern))?
                .compile_matcher();

            let exclude = if rule_cfg.exclude.is_empty() {
                None
            } else {
                let mut builder = GlobSetBuilder::new();
                for pat in rule_cfg.exclude.iter() {
                    let glob = Glob::new(pat)
                        .with_context(|| format!("compiling rule exclude '{pat}'"))?;
                    builder.add(glob);
                }
                Some(builder.build()?)
            };

            let mut chain = Vec::with_capacity(rule_cfg.steps.len());
            for step in rule_cfg.steps.iter() {
                let transform = Transform::parse(step)
                    .ok_or_else(|| anyhow!("unknown transform '{step}'"))?;
                chain.push(transform);
            }

            rules.push(LoaderRule {
                pattern,
                exclude,
                chain,
            });
        }

        Ok(RuleSet { rules })
    }

    /// The transform chain for a module path, if any rule claims it.
    ///
    /// A path hit by a rule's `exclude` still belongs to that rule, but with
    /// an empty (identity) chain: the file is bundled untouched.
    pub fn chain_for(&self, rel_path: &str) -> Option<&[Transform]> {
        for rule in self.rules.iter() {
            if rule.matches(rel_path) {
                if rule.excluded(rel_path) {
                    return Some(&[]);
                }
                return Some(rule.chain());
            }
        }
        None
    }
}

/// Whether modules carrying this chain should have their imports scanned.
///
/// Script modules are those that get transpiled, plus `exclude`d files whose
/// identity chain means they are already plain script code. Text modules
/// (raw/css/style) are leaves of the module graph.
pub fn chain_scans_imports(chain: &[Transform]) -> bool {
    chain.is_empty() || chain.contains(&Transform::Transpile)
}
