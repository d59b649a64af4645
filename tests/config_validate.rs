// tests/config_validate.rs

use devloop::config::{self, Config};
use devloop::errors::DevloopError;
use devloop_test_utils::builders::ConfigBuilder;

fn assert_config_error(result: devloop::errors::Result<Config>, needle: &str) {
    match result {
        Err(DevloopError::ConfigError(msg)) => {
            assert!(
                msg.contains(needle),
                "expected config error mentioning {needle:?}, got: {msg}"
            );
        }
        Err(other) => panic!("expected ConfigError, got: {other}"),
        Ok(_) => panic!("expected ConfigError, got a valid config"),
    }
}

#[test]
fn builtin_defaults_are_valid() {
    let cfg = Config::builtin().unwrap();
    assert_eq!(cfg.server().port, 3000);
    assert!(!cfg.server().open);
    assert_eq!(cfg.server().base_dir, "client");
    assert_eq!(cfg.bundle().entry, "client/app.js");
    assert_eq!(cfg.bundle().output, "bundle.js");
    assert_eq!(cfg.bundle().rules.len(), 3);
    assert_eq!(cfg.bundle_output_rel(), "client/bundle.js");
}

#[test]
fn output_must_be_a_single_bare_filename() {
    assert_config_error(
        ConfigBuilder::new().output("dist/bundle.js").try_build(),
        "bare filename",
    );
    assert_config_error(ConfigBuilder::new().output("").try_build(), "output");
}

#[test]
fn overlapping_rule_extensions_are_rejected() {
    let result = ConfigBuilder::new()
        .rule("**/*.js", &[], &["raw"])
        .try_build();
    assert_config_error(result, "claimed by more than one");
}

#[test]
fn brace_set_overlap_is_detected() {
    let result = ConfigBuilder::new()
        .clear_rules()
        .rule("*.js", &[], &["transpile"])
        .rule("*.{css,js}", &[], &["raw"])
        .try_build();
    assert_config_error(result, "claimed by more than one");
}

#[test]
fn disjoint_rules_are_accepted() {
    let cfg = ConfigBuilder::new()
        .clear_rules()
        .rule("*.js", &["**/node_modules/**"], &["transpile"])
        .rule("*.html", &[], &["raw"])
        .rule("*.css", &[], &["style", "css"])
        .build();
    assert_eq!(cfg.bundle().rules.len(), 3);
}

#[test]
fn unknown_transform_is_rejected() {
    let result = ConfigBuilder::new()
        .clear_rules()
        .rule("*.js", &[], &["babelify"])
        .try_build();
    assert_config_error(result, "unknown transform");
}

#[test]
fn rule_without_extension_class_is_rejected() {
    let result = ConfigBuilder::new()
        .clear_rules()
        .rule("src/**", &[], &["raw"])
        .try_build();
    assert_config_error(result, "extension class");
}

#[test]
fn port_zero_is_rejected() {
    assert_config_error(ConfigBuilder::new().port(0).try_build(), "port");
}

#[test]
fn empty_app_globs_are_rejected() {
    assert_config_error(
        ConfigBuilder::new().clear_app_globs().try_build(),
        "at least one glob",
    );
}

#[test]
fn entry_must_be_claimed_by_a_rule() {
    let result = ConfigBuilder::new()
        .clear_rules()
        .rule("*.css", &[], &["style", "css"])
        .try_build();
    assert_config_error(result, "not matched by any");
}

#[test]
fn loads_and_validates_a_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Devloop.toml");
    std::fs::write(
        &path,
        r#"
[server]
port = 4000

[bundle]
entry = "client/app.js"
output = "app.bundle.js"

[[bundle.rule]]
pattern = "*.js"
use = ["transpile"]
"#,
    )
    .unwrap();

    let cfg = config::load_and_validate(&path).unwrap();
    assert_eq!(cfg.server().port, 4000);
    assert_eq!(cfg.bundle().output, "app.bundle.js");
    // unspecified sections keep their defaults
    assert_eq!(cfg.paths().source, "client");
}

#[test]
fn invalid_toml_surfaces_as_toml_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Devloop.toml");
    std::fs::write(&path, "[server\nport = 4000").unwrap();

    match config::load_and_validate(&path) {
        Err(DevloopError::TomlError(_)) => {}
        other => panic!("expected TomlError, got: {other:?}"),
    }
}

#[test]
fn missing_file_falls_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config::load_or_builtin(dir.path().join("Devloop.toml")).unwrap();
    assert_eq!(cfg.server().port, 3000);
}
