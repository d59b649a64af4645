// src/config/model.rs

//! Configuration data model.
//!
//! `RawConfig` is the shape deserialized straight from `Devloop.toml`;
//! `Config` is the validated form the rest of the application consumes.
//! Conversion happens through `TryFrom<RawConfig>` in [`super::validate`].

use serde::Deserialize;

/// Raw, unvalidated configuration as deserialized from `Devloop.toml`.
///
/// Every section is optional; the defaults reproduce the canonical project
/// layout (a `client/` directory served on port 3000 with `bundle.js` as the
/// build artifact).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub bundle: BundleSection,
}

/// `[paths]` — where the application sources live.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Project-relative source root, watched recursively.
    #[serde(default = "default_source")]
    pub source: String,
    /// Glob patterns (relative to the project root) defining the app file set.
    #[serde(default = "default_app_globs")]
    pub app: Vec<String>,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            app: default_app_globs(),
        }
    }
}

/// `[server]` — development server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to auto-open a browser. Always honoured as `false`; the field
    /// exists so configs can state it explicitly.
    #[serde(default)]
    pub open: bool,
    /// Directory served by the dev server; must contain `index.html`.
    /// The bundle output is written here as well.
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            open: false,
            base_dir: default_base_dir(),
        }
    }
}

/// `[bundle]` — entry, output and transform rules.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleSection {
    /// The module the bundler starts dependency resolution from.
    #[serde(default = "default_entry")]
    pub entry: String,
    /// Bare output filename, written into `[server].base_dir`.
    #[serde(default = "default_output")]
    pub output: String,
    /// Ordered transform rules; the first rule whose pattern matches a
    /// module's path decides its transform chain.
    #[serde(default = "default_rules", rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

impl Default for BundleSection {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            output: default_output(),
            rules: default_rules(),
        }
    }
}

/// One `[[bundle.rule]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Extension-class glob, e.g. `*.js`.
    pub pattern: String,
    /// Paths matching any of these globs skip the transform chain (they are
    /// still bundled, just untouched).
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Named transform steps, applied right-to-left like loader chains.
    #[serde(rename = "use")]
    pub steps: Vec<String>,
}

fn default_source() -> String {
    "client".to_string()
}

fn default_app_globs() -> Vec<String> {
    vec!["client/**/*.{js,css,html}".to_string()]
}

fn default_port() -> u16 {
    3000
}

fn default_base_dir() -> String {
    "client".to_string()
}

fn default_entry() -> String {
    "client/app.js".to_string()
}

fn default_output() -> String {
    "bundle.js".to_string()
}

fn default_rules() -> Vec<RuleConfig> {
    vec![
        RuleConfig {
            pattern: "*.js".to_string(),
            exclude: vec!["**/node_modules/**".to_string()],
            steps: vec!["transpile".to_string()],
        },
        RuleConfig {
            pattern: "*.html".to_string(),
            exclude: vec![],
            steps: vec!["raw".to_string()],
        },
        RuleConfig {
            pattern: "*.css".to_string(),
            exclude: vec![],
            steps: vec!["style".to_string(), "css".to_string()],
        },
    ]
}

/// Validated configuration.
///
/// Constructed only through `TryFrom<RawConfig>` (or [`Config::builtin`]),
/// so holders can rely on the invariants checked in `validate`.
#[derive(Debug, Clone)]
pub struct Config {
    paths: PathsSection,
    server: ServerSection,
    bundle: BundleSection,
}

impl Config {
    /// Internal constructor used by the validation layer.
    pub(crate) fn new_unchecked(
        paths: PathsSection,
        server: ServerSection,
        bundle: BundleSection,
    ) -> Self {
        Self {
            paths,
            server,
            bundle,
        }
    }

    /// The built-in configuration used when no `Devloop.toml` exists.
    pub fn builtin() -> crate::errors::Result<Self> {
        Config::try_from(RawConfig::default())
    }

    pub fn paths(&self) -> &PathsSection {
        &self.paths
    }

    pub fn server(&self) -> &ServerSection {
        &self.server
    }

    pub fn bundle(&self) -> &BundleSection {
        &self.bundle
    }

    /// Project-relative path of the emitted bundle (`base_dir/output`),
    /// with forward slashes.
    pub fn bundle_output_rel(&self) -> String {
        format!(
            "{}/{}",
            self.server.base_dir.trim_end_matches('/'),
            self.bundle.output
        )
    }
}
