// src/tasks/mod.rs

//! Task orchestration.
//!
//! Four named tasks compose the pipeline:
//! - `build` bundles the entry module,
//! - `serve` starts the dev server,
//! - `watch` rebuilds and reloads browsers on file changes,
//! - `default` runs build, then serve, then watch, strictly in that order.
//!
//! The runner talks to a [`TaskBackend`] instead of doing the work itself,
//! so tests can substitute a recording fake.

pub mod backend;
pub mod runner;

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

pub use backend::{PipelineBackend, TaskBackend};
pub use runner::run_sequence;

/// The named tasks the CLI exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskKind {
    Build,
    Serve,
    Watch,
    Default,
}

impl TaskKind {
    /// The concrete task sequence this selection expands to.
    ///
    /// `default` is build -> serve -> watch, in series; every other task is
    /// just itself.
    pub fn sequence(self) -> &'static [TaskKind] {
        match self {
            TaskKind::Default => &[TaskKind::Build, TaskKind::Serve, TaskKind::Watch],
            TaskKind::Build => &[TaskKind::Build],
            TaskKind::Serve => &[TaskKind::Serve],
            TaskKind::Watch => &[TaskKind::Watch],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Build => "build",
            TaskKind::Serve => "serve",
            TaskKind::Watch => "watch",
            TaskKind::Default => "default",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed,
}

/// Events flowing from the watcher into the rebuild loop.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A watched app file changed on disk (project-relative path).
    FileChanged { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_expands_to_build_serve_watch() {
        assert_eq!(
            TaskKind::Default.sequence(),
            &[TaskKind::Build, TaskKind::Serve, TaskKind::Watch]
        );
    }

    #[test]
    fn single_tasks_expand_to_themselves() {
        assert_eq!(TaskKind::Build.sequence(), &[TaskKind::Build]);
        assert_eq!(TaskKind::Serve.sequence(), &[TaskKind::Serve]);
        assert_eq!(TaskKind::Watch.sequence(), &[TaskKind::Watch]);
    }
}
