// src/bundle/emit.rs

//! Bundle assembly.
//!
//! The output is a single self-executing script: a module map keyed by
//! project-relative ids, a memoizing `require`, and a final call that loads
//! the entry module. Each module's wrapper carries its own specifier -> id
//! table so transformed sources never need their import strings rewritten.

use std::fmt::Write as _;

use crate::bundle::graph::ModuleGraph;
use crate::bundle::transform::{apply_chain, js_string_literal};
use crate::errors::Result;

/// Render the whole bundle as a string.
pub fn emit_bundle(graph: &ModuleGraph) -> Result<String> {
    let mut modules_src = String::new();

    for module in graph.modules() {
        let body = apply_chain(&module.chain, &module.id, &module.source)?;

        let mut deps_src = String::new();
        for (spec, id) in module.deps.iter() {
            if !deps_src.is_empty() {
                deps_src.push_str(", ");
            }
            let _ = write!(
                deps_src,
                "{}: {}",
                js_string_literal(spec),
                js_string_literal(id)
            );
        }

        let _ = write!(
            modules_src,
            "{id}: {{\n  deps: {{{deps_src}}},\n  fn: function (module, exports, require) {{\n{body}  }}\n}},\n",
            id = js_string_literal(&module.id),
        );
    }

    Ok(format!(
        "{runtime}({entry}, {{\n{modules_src}}});\n",
        runtime = RUNTIME,
        entry = js_string_literal(graph.entry_id()),
    ))
}

/// The in-browser module runtime.
///
/// `load` memoizes by id; each module function gets a local `require` that
/// first consults the module's deps table, so import specifiers written in
/// source code keep working unchanged.
const RUNTIME: &str = r#"(function (entryId, modules) {
  var cache = {};
  function load(id) {
    if (cache[id]) {
      return cache[id].exports;
    }
    var def = modules[id];
    if (!def) {
      throw new Error("devloop runtime: unknown module \"" + id + "\"");
    }
    var module = (cache[id] = { exports: {} });
    function localRequire(spec) {
      var target = Object.prototype.hasOwnProperty.call(def.deps, spec)
        ? def.deps[spec]
        : spec;
      return load(target);
    }
    def.fn.call(module.exports, module, module.exports, localRequire);
    return module.exports;
  }
  load(entryId);
})"#;
