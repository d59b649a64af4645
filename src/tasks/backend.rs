// src/tasks/backend.rs

//! Pluggable task backend abstraction.
//!
//! The runner talks to a `TaskBackend` instead of calling into the bundler,
//! server and watcher directly. This makes it easy to swap in a recording
//! fake in tests while keeping the production wiring in [`PipelineBackend`].

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::bundle::Bundler;
use crate::config::Config;
use crate::errors::Result;
use crate::serve::{self, ReloadHandle, ServerHandle};
use crate::tasks::{PipelineEvent, TaskKind, TaskOutcome};
use crate::watch::{self, WatcherHandle};

/// Trait abstracting how named tasks are executed.
///
/// "Completion" follows dev-pipeline semantics: `build` completes when the
/// bundle is written, `serve` once the listener is bound and accepting,
/// `watch` once the filesystem watcher is registered. Background loops keep
/// running after their task completes.
pub trait TaskBackend: Send {
    fn run_task(
        &mut self,
        task: TaskKind,
    ) -> Pin<Box<dyn Future<Output = Result<TaskOutcome>> + Send + '_>>;
}

/// Production backend wiring bundler, server and watcher together.
///
/// The reload fan-out is created up front so the watch loop can broadcast
/// whether or not the server task has run; with no server there are simply
/// no subscribers.
pub struct PipelineBackend {
    root: PathBuf,
    config: Arc<Config>,
    reload: ReloadHandle,
    server: Option<ServerHandle>,
    watcher: Option<WatcherHandle>,
}

impl PipelineBackend {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config: Arc::new(config),
            reload: ReloadHandle::new(),
            server: None,
            watcher: None,
        }
    }

    /// True when neither server nor watcher runs in the background.
    pub fn is_idle(&self) -> bool {
        self.server.is_none() && self.watcher.is_none()
    }

    pub fn server(&self) -> Option<&ServerHandle> {
        self.server.as_ref()
    }

    async fn run_build(&self) -> Result<TaskOutcome> {
        let bundler = Bundler::new(&self.root, &self.config)?;
        let report = bundler.build()?;
        info!(modules = report.modules, output = ?report.output, "build finished");
        Ok(TaskOutcome::Success)
    }

    async fn run_serve(&mut self) -> Result<TaskOutcome> {
        let base_dir = self.root.join(&self.config.server().base_dir);
        let handle = serve::spawn_server(
            base_dir,
            self.config.server().port,
            self.reload.clone(),
        )
        .await?;
        self.server = Some(handle);
        Ok(TaskOutcome::Success)
    }

    async fn run_watch(&mut self) -> Result<TaskOutcome> {
        let profile = watch::build_watch_profile(&self.config)?;
        let (tx, mut rx) = mpsc::channel::<PipelineEvent>(64);
        let handle = watch::spawn_watcher(self.root.clone(), profile, tx)?;
        self.watcher = Some(handle);

        // Rebuild-and-reload loop. Rebuild strictly precedes reload; a
        // failed rebuild keeps the last good bundle on disk and skips the
        // reload.
        let root = self.root.clone();
        let config = Arc::clone(&self.config);
        let reload = self.reload.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    PipelineEvent::FileChanged { path } => {
                        info!(path = ?path, "change detected, rebuilding");
                        let rebuilt =
                            Bundler::new(&root, &config).and_then(|b| b.build());
                        match rebuilt {
                            Ok(report) => {
                                let clients = reload.notify();
                                info!(
                                    modules = report.modules,
                                    clients,
                                    "rebuild finished, reload sent"
                                );
                            }
                            Err(e) => {
                                error!(error = %e, "rebuild failed; not reloading");
                            }
                        }
                    }
                }
            }
            debug!("rebuild loop finished");
        });

        Ok(TaskOutcome::Success)
    }
}

impl TaskBackend for PipelineBackend {
    fn run_task(
        &mut self,
        task: TaskKind,
    ) -> Pin<Box<dyn Future<Output = Result<TaskOutcome>> + Send + '_>> {
        Box::pin(async move {
            match task {
                TaskKind::Build => self.run_build().await,
                TaskKind::Serve => self.run_serve().await,
                TaskKind::Watch => self.run_watch().await,
                // Normally expanded by the caller; running it directly
                // behaves identically.
                TaskKind::Default => {
                    let mut last = TaskOutcome::Success;
                    for &t in TaskKind::Default.sequence() {
                        last = self.run_task(t).await?;
                        if last != TaskOutcome::Success {
                            break;
                        }
                    }
                    Ok(last)
                }
            }
        })
    }
}
