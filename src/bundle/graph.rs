// src/bundle/graph.rs

//! Module graph resolution.
//!
//! Starting from the entry module, scan import specifiers, resolve them to
//! project-relative module ids, and order the result dependencies-first.
//! Only relative specifiers are followed; the bundler does not resolve
//! package names.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use regex::Regex;
use tracing::debug;

use crate::bundle::rules::{RuleSet, chain_scans_imports};
use crate::bundle::transform::Transform;
use crate::errors::{DevloopError, Result};

/// A resolved module: one source file plus its outgoing imports.
#[derive(Debug)]
pub struct Module {
    /// Project-relative slash path; doubles as the runtime module id.
    pub id: String,
    pub path: PathBuf,
    pub source: String,
    /// Transform chain from the first matching rule.
    pub chain: Vec<Transform>,
    /// Import specifier -> resolved module id.
    pub deps: BTreeMap<String, String>,
}

/// The full module graph, in deterministic dependencies-first order.
#[derive(Debug)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    entry_id: String,
}

impl ModuleGraph {
    /// Resolve the graph reachable from `entry_rel` (a project-relative
    /// slash path) under `root`.
    pub fn resolve(root: &Path, entry_rel: &str, rules: &RuleSet) -> Result<ModuleGraph> {
        let scanner = ImportScanner::new()?;
        let entry_id = entry_rel.replace('\\', "/");

        let mut discovered: HashMap<String, Module> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(entry_id.clone());

        while let Some(id) = queue.pop_front() {
            if discovered.contains_key(&id) {
                continue;
            }

            let path = root.join(&id);
            let source = fs::read_to_string(&path).map_err(|e| {
                DevloopError::BundleError(format!("cannot read module '{id}': {e}"))
            })?;

            let chain = rules.chain_for(&id).ok_or_else(|| {
                DevloopError::BundleError(format!(
                    "no [[bundle.rule]] matches module '{id}'"
                ))
            })?;

            let mut deps = BTreeMap::new();
            if chain_scans_imports(chain) {
                for spec in scanner.scan(&source) {
                    let resolved = resolve_specifier(root, &id, &spec)?;
                    queue.push_back(resolved.clone());
                    deps.insert(spec, resolved);
                }
            }

            debug!(id = %id, deps = deps.len(), "resolved module");
            order.push(id.clone());
            discovered.insert(
                id.clone(),
                Module {
                    id,
                    path,
                    source,
                    chain: chain.to_vec(),
                    deps,
                },
            );
        }

        let sorted = sort_dependencies_first(&order, &discovered)?;

        let mut modules = Vec::with_capacity(sorted.len());
        for id in sorted {
            if let Some(module) = discovered.remove(&id) {
                modules.push(module);
            }
        }

        Ok(ModuleGraph { modules, entry_id })
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Topological order with dependencies before dependents.
///
/// Edge direction: dependency -> importer, so a toposort yields dependencies
/// first. A cycle in the import graph is an error.
fn sort_dependencies_first(
    order: &[String],
    discovered: &HashMap<String, Module>,
) -> Result<Vec<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for id in order {
        graph.add_node(id.as_str());
    }
    for id in order {
        if let Some(module) = discovered.get(id) {
            for dep_id in module.deps.values() {
                graph.add_edge(dep_id.as_str(), id.as_str(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(sorted) => Ok(sorted.into_iter().map(|s| s.to_string()).collect()),
        Err(cycle) => Err(DevloopError::BundleError(format!(
            "import cycle detected involving module '{}'",
            cycle.node_id()
        ))),
    }
}

/// Resolve an import specifier against the importing module's directory.
///
/// Tries the literal path first, then with `.js` appended. The resolved path
/// must stay inside the project root.
fn resolve_specifier(root: &Path, importer_id: &str, spec: &str) -> Result<String> {
    if !spec.starts_with("./") && !spec.starts_with("../") {
        return Err(DevloopError::BundleError(format!(
            "module '{importer_id}': bare import '{spec}' is not supported \
             (only relative paths are bundled)"
        )));
    }

    let importer_dir = match importer_id.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };

    let joined = normalize_join(importer_dir, spec).ok_or_else(|| {
        DevloopError::BundleError(format!(
            "module '{importer_id}': import '{spec}' escapes the project root"
        ))
    })?;

    for candidate in [joined.clone(), format!("{joined}.js")] {
        if root.join(&candidate).is_file() {
            return Ok(candidate);
        }
    }

    Err(DevloopError::BundleError(format!(
        "module '{importer_id}': cannot resolve import '{spec}'"
    )))
}

/// Join a relative specifier onto a base directory and normalize `.`/`..`
/// components. Returns `None` if the result would climb above the root.
fn normalize_join(base_dir: &str, spec: &str) -> Option<String> {
    let mut parts: Vec<&str> = if base_dir.is_empty() {
        Vec::new()
    } else {
        base_dir.split('/').collect()
    };

    for comp in spec.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Compiled import/require scanning patterns.
struct ImportScanner {
    import_re: Regex,
    require_re: Regex,
}

impl ImportScanner {
    fn new() -> Result<Self> {
        let import_re = Regex::new(
            r#"(?m)^\s*import\s+[^'";]*?['"]([^'"]+)['"]\s*;?\s*$"#,
        )
        .context("compiling import pattern")?;
        let require_re = Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#)
            .context("compiling require pattern")?;
        Ok(Self {
            import_re,
            require_re,
        })
    }

    /// Collect distinct import specifiers in source order.
    fn scan(&self, source: &str) -> Vec<String> {
        let mut specs: Vec<String> = Vec::new();
        for caps in self
            .import_re
            .captures_iter(source)
            .chain(self.require_re.captures_iter(source))
        {
            let spec = caps[1].to_string();
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
        specs
    }
}
