#![allow(dead_code)]

use devloop::config::{Config, RawConfig, RuleConfig};

/// Builder for `Config` to simplify test setup.
///
/// Starts from the built-in defaults; every setter overrides one piece.
pub struct ConfigBuilder {
    raw: RawConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawConfig::default(),
        }
    }

    pub fn source(mut self, dir: &str) -> Self {
        self.raw.paths.source = dir.to_string();
        self
    }

    pub fn clear_app_globs(mut self) -> Self {
        self.raw.paths.app.clear();
        self
    }

    pub fn app_glob(mut self, pattern: &str) -> Self {
        self.raw.paths.app.push(pattern.to_string());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.raw.server.port = port;
        self
    }

    pub fn base_dir(mut self, dir: &str) -> Self {
        self.raw.server.base_dir = dir.to_string();
        self
    }

    pub fn entry(mut self, entry: &str) -> Self {
        self.raw.bundle.entry = entry.to_string();
        self
    }

    pub fn output(mut self, output: &str) -> Self {
        self.raw.bundle.output = output.to_string();
        self
    }

    pub fn clear_rules(mut self) -> Self {
        self.raw.bundle.rules.clear();
        self
    }

    pub fn rule(mut self, pattern: &str, exclude: &[&str], steps: &[&str]) -> Self {
        self.raw.bundle.rules.push(RuleConfig {
            pattern: pattern.to_string(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> Config {
        Config::try_from(self.raw).expect("Failed to build valid config from builder")
    }

    /// Like [`build`](Self::build), but hands back the validation result so
    /// tests can assert on rejections.
    pub fn try_build(self) -> devloop::errors::Result<Config> {
        Config::try_from(self.raw)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
