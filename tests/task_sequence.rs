// tests/task_sequence.rs
//
// Ordering is the invariant here, not timing: build completes before serve
// starts, and serve completes before watch starts.

use std::sync::{Arc, Mutex};

use devloop::errors::DevloopError;
use devloop::tasks::{TaskKind, run_sequence};
use devloop_test_utils::fake_backend::RecordingBackend;
use devloop_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn default_sequence_runs_build_serve_watch_in_order() {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut backend = RecordingBackend::new(log.clone());

    with_timeout(run_sequence(&mut backend, TaskKind::Default.sequence()))
        .await
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        [
            "build:start",
            "build:done",
            "serve:start",
            "serve:done",
            "watch:start",
            "watch:done",
        ]
    );
}

#[tokio::test]
async fn sequence_completes_only_after_the_last_task() {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut backend = RecordingBackend::new(log.clone());

    with_timeout(run_sequence(&mut backend, TaskKind::Default.sequence()))
        .await
        .unwrap();

    // By the time run_sequence resolves, every task has finished.
    let log = log.lock().unwrap();
    assert_eq!(log.last().map(String::as_str), Some("watch:done"));
}

#[tokio::test]
async fn failed_task_aborts_the_rest_of_the_sequence() {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut backend = RecordingBackend::failing_on(log.clone(), TaskKind::Serve);

    let err = with_timeout(run_sequence(&mut backend, TaskKind::Default.sequence()))
        .await
        .unwrap_err();

    match err {
        DevloopError::TaskFailed(name) => assert_eq!(name, "serve"),
        other => panic!("expected TaskFailed, got: {other}"),
    }

    let log = log.lock().unwrap();
    assert!(log.contains(&"build:done".to_string()));
    assert!(log.contains(&"serve:failed".to_string()));
    assert!(
        !log.iter().any(|entry| entry.starts_with("watch:")),
        "watch must never start after serve failed: {log:?}"
    );
}

#[tokio::test]
async fn single_task_runs_alone() {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut backend = RecordingBackend::new(log.clone());

    with_timeout(run_sequence(&mut backend, TaskKind::Build.sequence()))
        .await
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(*log, ["build:start", "build:done"]);
}
