// src/bundle/transform.rs

//! Module transforms.
//!
//! Each `[[bundle.rule]]` names a chain of transforms. Chains compose
//! right-to-left the way bundler loader chains do: in `use = ["style", "css"]`
//! the `css` step runs first and its result feeds `style`.

use std::fmt;

use crate::errors::{DevloopError, Result};

/// A named transform step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Rewrite ES module syntax into the bundle's CommonJS-style runtime.
    Transpile,
    /// Export the file's text as a string.
    Raw,
    /// Wrap a string of CSS in code that injects a `<style>` tag on load.
    Style,
    /// Interpret the file as a stylesheet, yielding its text as a string.
    Css,
}

impl Transform {
    pub const KNOWN_NAMES: [&'static str; 4] = ["transpile", "raw", "style", "css"];

    pub fn parse(name: &str) -> Option<Transform> {
        match name {
            "transpile" => Some(Transform::Transpile),
            "raw" => Some(Transform::Raw),
            "style" => Some(Transform::Style),
            "css" => Some(Transform::Css),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Transpile => "transpile",
            Transform::Raw => "raw",
            Transform::Style => "style",
            Transform::Css => "css",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a partially-applied chain currently holds.
///
/// A chain starts from the raw `Source` text. String-producing steps yield an
/// `Expr` (a JS expression); a finished module function body is `Body`.
enum Stage {
    Source(String),
    Expr(String),
    Body(String),
}

/// Apply a transform chain to a module source, producing the body of its
/// CommonJS-style module function.
///
/// An empty chain is the identity: the source is assumed to already be plain
/// script code (this is what an `exclude`d file gets).
pub fn apply_chain(chain: &[Transform], rel_path: &str, source: &str) -> Result<String> {
    let mut stage = Stage::Source(source.to_string());

    for step in chain.iter().rev() {
        stage = apply_step(*step, stage).map_err(|msg| {
            DevloopError::BundleError(format!("module '{rel_path}': {msg}"))
        })?;
    }

    Ok(match stage {
        Stage::Source(body) => body,
        Stage::Expr(expr) => format!("module.exports = {expr};\n"),
        Stage::Body(body) => body,
    })
}

fn apply_step(step: Transform, stage: Stage) -> std::result::Result<Stage, String> {
    match (step, stage) {
        (Transform::Transpile, Stage::Source(src)) => Ok(Stage::Body(transpile(&src))),
        (Transform::Raw, Stage::Source(src)) => Ok(Stage::Expr(js_string_literal(&src))),
        (Transform::Css, Stage::Source(src)) => Ok(Stage::Expr(js_string_literal(&src))),
        (Transform::Style, Stage::Source(src)) => {
            Ok(Stage::Body(style_inject(&js_string_literal(&src))))
        }
        (Transform::Style, Stage::Expr(expr)) => Ok(Stage::Body(style_inject(&expr))),
        (step, _) => Err(format!(
            "transform '{step}' cannot be applied at this position in the chain"
        )),
    }
}

/// Code that injects a stylesheet expression into the document head.
fn style_inject(css_expr: &str) -> String {
    format!(
        "var css = {css_expr};\n\
         var style = document.createElement(\"style\");\n\
         style.setAttribute(\"type\", \"text/css\");\n\
         style.appendChild(document.createTextNode(css));\n\
         document.head.appendChild(style);\n\
         module.exports = css;\n"
    )
}

/// Escape text into a double-quoted JS string literal.
///
/// U+2028/U+2029 are escaped as well since older parsers treat them as line
/// terminators inside literals.
pub fn js_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Rewrite the ES-module subset the pipeline supports into CommonJS-style
/// code for the bundle runtime.
///
/// Covered forms (one per line):
/// - `import name from "spec";`
/// - `import { a, b as c } from "spec";`
/// - `import * as ns from "spec";`
/// - `import "spec";`
/// - `export default <expr>`
/// - `export const|let|var|function|class NAME ...`
/// - `export { a, b as c };`
///
/// This is not a general transpiler; it covers the module syntax a small
/// client app uses. Anything else passes through untouched. Import
/// specifiers are left as-is: the runtime maps them to module ids through
/// each module's deps table.
pub fn transpile(source: &str) -> String {
    let rewriter = match Rewriter::new() {
        Ok(r) => r,
        // The patterns are fixed strings; failing to compile them would be a
        // build bug, not an input error. Passing the source through untouched
        // keeps the bundle at least inspectable.
        Err(_) => return source.to_string(),
    };
    rewriter.rewrite(source)
}

struct Rewriter {
    import_default: regex::Regex,
    import_named: regex::Regex,
    import_namespace: regex::Regex,
    import_bare: regex::Regex,
    export_default: regex::Regex,
    export_decl: regex::Regex,
    export_list: regex::Regex,
}

impl Rewriter {
    fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            import_default: regex::Regex::new(
                r#"^\s*import\s+([A-Za-z_$][\w$]*)\s+from\s*['"]([^'"]+)['"]\s*;?\s*$"#,
            )?,
            import_named: regex::Regex::new(
                r#"^\s*import\s*\{([^}]*)\}\s*from\s*['"]([^'"]+)['"]\s*;?\s*$"#,
            )?,
            import_namespace: regex::Regex::new(
                r#"^\s*import\s*\*\s*as\s+([A-Za-z_$][\w$]*)\s+from\s*['"]([^'"]+)['"]\s*;?\s*$"#,
            )?,
            import_bare: regex::Regex::new(r#"^\s*import\s*['"]([^'"]+)['"]\s*;?\s*$"#)?,
            export_default: regex::Regex::new(r"^(\s*)export\s+default\s+")?,
            export_decl: regex::Regex::new(
                r"^(\s*)export\s+(const|let|var|function|class)\s+([A-Za-z_$][\w$]*)",
            )?,
            export_list: regex::Regex::new(r"^\s*export\s*\{([^}]*)\}\s*;?\s*$")?,
        })
    }

    fn rewrite(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        let mut exported: Vec<String> = Vec::new();

        for line in source.lines() {
            if let Some(caps) = self.import_default.captures(line) {
                out.push_str(&format!(
                    "const {} = require(\"{}\");\n",
                    &caps[1], &caps[2]
                ));
            } else if let Some(caps) = self.import_namespace.captures(line) {
                out.push_str(&format!(
                    "const {} = require(\"{}\");\n",
                    &caps[1], &caps[2]
                ));
            } else if let Some(caps) = self.import_named.captures(line) {
                out.push_str(&format!(
                    "const {{{}}} = require(\"{}\");\n",
                    rewrite_binding_list(&caps[1]),
                    &caps[2]
                ));
            } else if let Some(caps) = self.import_bare.captures(line) {
                out.push_str(&format!("require(\"{}\");\n", &caps[1]));
            } else if let Some(caps) = self.export_list.captures(line) {
                for item in caps[1].split(',') {
                    let item = item.trim();
                    if item.is_empty() {
                        continue;
                    }
                    match item.split_once(" as ") {
                        Some((local, public)) => out.push_str(&format!(
                            "exports.{} = {};\n",
                            public.trim(),
                            local.trim()
                        )),
                        None => out.push_str(&format!("exports.{item} = {item};\n")),
                    }
                }
            } else if let Some(caps) = self.export_decl.captures(line) {
                exported.push(caps[3].to_string());
                out.push_str(&self.export_decl.replace(line, "${1}${2} ${3}"));
                out.push('\n');
            } else if self.export_default.is_match(line) {
                out.push_str(&self.export_default.replace(line, "${1}module.exports = "));
                out.push('\n');
            } else {
                out.push_str(line);
                out.push('\n');
            }
        }

        for name in exported {
            out.push_str(&format!("exports.{name} = {name};\n"));
        }

        out
    }
}

/// Turn an import binding list (`a, b as c`) into destructuring (`a, b: c`).
fn rewrite_binding_list(inner: &str) -> String {
    inner
        .split(',')
        .map(|item| {
            let item = item.trim();
            match item.split_once(" as ") {
                Some((orig, alias)) => format!("{}: {}", orig.trim(), alias.trim()),
                None => item.to_string(),
            }
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
