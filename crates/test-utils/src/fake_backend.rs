use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use devloop::errors::Result;
use devloop::tasks::{TaskBackend, TaskKind, TaskOutcome};

/// A fake task backend that:
/// - records `<task>:start` / `<task>:done` markers in order
/// - yields between the markers so concurrent execution would interleave
/// - optionally fails a chosen task.
pub struct RecordingBackend {
    log: Arc<Mutex<Vec<String>>>,
    fail_on: Option<TaskKind>,
}

impl RecordingBackend {
    pub fn new(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { log, fail_on: None }
    }

    pub fn failing_on(log: Arc<Mutex<Vec<String>>>, task: TaskKind) -> Self {
        Self {
            log,
            fail_on: Some(task),
        }
    }
}

impl TaskBackend for RecordingBackend {
    fn run_task(
        &mut self,
        task: TaskKind,
    ) -> Pin<Box<dyn Future<Output = Result<TaskOutcome>> + Send + '_>> {
        let log = Arc::clone(&self.log);
        let fail_on = self.fail_on;

        Box::pin(async move {
            {
                let mut guard = log.lock().unwrap();
                guard.push(format!("{task}:start"));
            }

            // Give any (incorrectly) concurrent sibling a chance to run.
            tokio::task::yield_now().await;

            if fail_on == Some(task) {
                let mut guard = log.lock().unwrap();
                guard.push(format!("{task}:failed"));
                return Ok(TaskOutcome::Failed);
            }

            let mut guard = log.lock().unwrap();
            guard.push(format!("{task}:done"));
            Ok(TaskOutcome::Success)
        })
    }
}
