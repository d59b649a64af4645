// src/tasks/runner.rs

//! Sequential task execution.
//!
//! Run-in-series semantics: each task runs to completion before the next
//! one starts, and the sequence as a whole completes only after the last
//! task finishes. The first failure aborts the rest.

use tracing::info;

use crate::errors::{DevloopError, Result};
use crate::tasks::{TaskBackend, TaskKind, TaskOutcome};

pub async fn run_sequence<B: TaskBackend>(
    backend: &mut B,
    tasks: &[TaskKind],
) -> Result<()> {
    for &task in tasks {
        info!(task = %task, "task starting");
        let outcome = backend.run_task(task).await?;
        match outcome {
            TaskOutcome::Success => info!(task = %task, "task finished"),
            TaskOutcome::Failed => {
                return Err(DevloopError::TaskFailed(task.name().to_string()));
            }
        }
    }
    Ok(())
}
