// tests/bundle_build.rs

use devloop::bundle::Bundler;
use devloop::errors::DevloopError;
use devloop_test_utils::builders::ConfigBuilder;
use devloop_test_utils::fixture;

fn assert_bundle_error(err: DevloopError, needle: &str) {
    match err {
        DevloopError::BundleError(msg) => {
            assert!(
                msg.contains(needle),
                "expected bundle error mentioning {needle:?}, got: {msg}"
            );
        }
        other => panic!("expected BundleError, got: {other}"),
    }
}

#[test]
fn bundles_fixture_app_into_single_output() {
    let project = fixture::sample_project().unwrap();
    let cfg = ConfigBuilder::new().build();

    let bundler = Bundler::new(project.path(), &cfg).unwrap();
    let report = bundler.build().unwrap();

    assert_eq!(report.output, project.path().join("client/bundle.js"));
    // entry + message.js + template.html + style.css + vendor.js
    assert_eq!(report.modules, 5);

    let bundle = std::fs::read_to_string(&report.output).unwrap();

    // html imported as raw text
    assert!(bundle.contains("devloop fixture"));
    // css run through the style-injection chain
    assert!(bundle.contains("document.createElement(\"style\")"));
    assert!(bundle.contains("#fafafa"));
    // entry transpiled into runtime requires
    assert!(bundle.contains("const {greet} = require(\"./message.js\");"));
    assert!(bundle.contains("require(\"./style.css\");"));
    // excluded node_modules file is bundled untouched
    assert!(bundle.contains("module.exports = { version: \"1.0.0\" };"));
    // the runtime boots from the entry module
    assert!(bundle.contains("})(\"client/app.js\", {"));
}

#[test]
fn dependencies_are_emitted_before_dependents() {
    let project = fixture::sample_project().unwrap();
    let cfg = ConfigBuilder::new().build();

    let report = Bundler::new(project.path(), &cfg)
        .unwrap()
        .build()
        .unwrap();
    let bundle = std::fs::read_to_string(&report.output).unwrap();

    let entry_at = bundle.find("\"client/app.js\": {").unwrap();
    for dep in [
        "\"client/message.js\": {",
        "\"client/template.html\": {",
        "\"client/style.css\": {",
        "\"client/node_modules/vendor.js\": {",
    ] {
        let dep_at = bundle.find(dep).unwrap();
        assert!(
            dep_at < entry_at,
            "{dep} must be defined before the entry module"
        );
    }
}

#[test]
fn rebuild_overwrites_the_previous_bundle() {
    let project = fixture::sample_project().unwrap();
    let cfg = ConfigBuilder::new().build();
    let bundler = Bundler::new(project.path(), &cfg).unwrap();

    bundler.build().unwrap();
    std::fs::write(
        project.path().join("client/template.html"),
        "<h1>second pass</h1>\n",
    )
    .unwrap();
    let report = bundler.build().unwrap();

    let bundle = std::fs::read_to_string(&report.output).unwrap();
    assert!(bundle.contains("second pass"));
    assert!(!bundle.contains("devloop fixture"));
}

#[test]
fn missing_entry_is_a_bundle_error() {
    let project = tempfile::tempdir().unwrap();
    let cfg = ConfigBuilder::new().build();

    let err = Bundler::new(project.path(), &cfg)
        .unwrap()
        .build()
        .unwrap_err();
    assert_bundle_error(err, "cannot read module 'client/app.js'");
}

#[test]
fn file_matched_by_no_rule_is_a_bundle_error() {
    let project = tempfile::tempdir().unwrap();
    let client = project.path().join("client");
    std::fs::create_dir_all(&client).unwrap();
    std::fs::write(client.join("app.js"), "import data from './data.json';\n").unwrap();
    std::fs::write(client.join("data.json"), "{\"k\": 1}\n").unwrap();

    let cfg = ConfigBuilder::new().build();
    let err = Bundler::new(project.path(), &cfg)
        .unwrap()
        .build()
        .unwrap_err();
    assert_bundle_error(err, "no [[bundle.rule]] matches module 'client/data.json'");
}

#[test]
fn unresolvable_import_is_a_bundle_error() {
    let project = tempfile::tempdir().unwrap();
    let client = project.path().join("client");
    std::fs::create_dir_all(&client).unwrap();
    std::fs::write(client.join("app.js"), "import gone from './gone.js';\n").unwrap();

    let cfg = ConfigBuilder::new().build();
    let err = Bundler::new(project.path(), &cfg)
        .unwrap()
        .build()
        .unwrap_err();
    assert_bundle_error(err, "cannot resolve import './gone.js'");
}

#[test]
fn bare_imports_are_rejected() {
    let project = tempfile::tempdir().unwrap();
    let client = project.path().join("client");
    std::fs::create_dir_all(&client).unwrap();
    std::fs::write(client.join("app.js"), "import _ from 'lodash';\n").unwrap();

    let cfg = ConfigBuilder::new().build();
    let err = Bundler::new(project.path(), &cfg)
        .unwrap()
        .build()
        .unwrap_err();
    assert_bundle_error(err, "bare import 'lodash'");
}

#[test]
fn import_cycles_are_detected() {
    let project = tempfile::tempdir().unwrap();
    let client = project.path().join("client");
    std::fs::create_dir_all(&client).unwrap();
    std::fs::write(client.join("a.js"), "import b from './b.js';\n").unwrap();
    std::fs::write(client.join("b.js"), "import a from './a.js';\n").unwrap();

    let cfg = ConfigBuilder::new().entry("client/a.js").build();
    let err = Bundler::new(project.path(), &cfg)
        .unwrap()
        .build()
        .unwrap_err();
    assert_bundle_error(err, "import cycle");
}

#[test]
fn specifier_without_extension_resolves_to_js_file() {
    let project = tempfile::tempdir().unwrap();
    let client = project.path().join("client");
    std::fs::create_dir_all(&client).unwrap();
    std::fs::write(client.join("app.js"), "import m from './message';\n").unwrap();
    std::fs::write(client.join("message.js"), "export default 1;\n").unwrap();

    let cfg = ConfigBuilder::new().build();
    let report = Bundler::new(project.path(), &cfg)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(report.modules, 2);

    let bundle = std::fs::read_to_string(&report.output).unwrap();
    // the deps table maps the bare specifier onto the resolved id
    assert!(bundle.contains("\"./message\": \"client/message.js\""));
}
