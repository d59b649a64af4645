// tests/watch_rebuild.rs
//
// Drives the real watcher against a temp project: a change to a watched
// file must produce a fresh bundle without any further prompting.

use std::time::Duration;

use tokio::time::sleep;

use devloop::tasks::{PipelineBackend, TaskKind, run_sequence};
use devloop_test_utils::builders::ConfigBuilder;
use devloop_test_utils::{fixture, init_tracing};

#[tokio::test]
async fn watch_rebuilds_after_a_source_change() {
    init_tracing();
    let project = fixture::sample_project().unwrap();
    let cfg = ConfigBuilder::new().build();

    let mut backend = PipelineBackend::new(project.path(), cfg);
    run_sequence(&mut backend, &[TaskKind::Build, TaskKind::Watch])
        .await
        .unwrap();
    assert!(!backend.is_idle());

    let bundle_path = project.path().join("client/bundle.js");
    let first = std::fs::read_to_string(&bundle_path).unwrap();
    assert!(first.contains("devloop fixture"));

    // Give the watcher a moment to register before mutating the tree.
    sleep(Duration::from_millis(250)).await;
    std::fs::write(
        project.path().join("client/template.html"),
        "<h1>watched change</h1>\n",
    )
    .unwrap();

    // Rebuilds are asynchronous; poll the output until the change lands.
    let mut rebuilt = String::new();
    for _ in 0..100 {
        sleep(Duration::from_millis(100)).await;
        rebuilt = std::fs::read_to_string(&bundle_path).unwrap();
        if rebuilt.contains("watched change") {
            break;
        }
    }
    assert!(
        rebuilt.contains("watched change"),
        "bundle was not rebuilt after the template change"
    );
}
