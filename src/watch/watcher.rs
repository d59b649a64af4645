// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::tasks::PipelineEvent;
use crate::watch::hash::FileHashCache;
use crate::watch::patterns::WatchProfile;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes the given `root` directory
/// recursively and sends `PipelineEvent::FileChanged` for app files whose
/// contents actually changed.
///
/// - `root` is the project root against which the glob patterns are evaluated.
/// - `profile` is the compiled app file set.
/// - `pipeline_tx` is the channel into the task pipeline.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profile: WatchProfile,
    pipeline_tx: mpsc::Sender<PipelineEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| {
                match res {
                    Ok(event) => {
                        if let Err(err) = event_tx.send(event) {
                            // We can't log via tracing here easily, so fall back to stderr.
                            eprintln!("devloop: failed to forward notify event: {err}");
                        }
                    }
                    Err(err) => {
                        eprintln!("devloop: file watch error: {err}");
                    }
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that filters notify events and forwards app-file changes.
    let async_root = root.clone();
    tokio::spawn(async move {
        let mut hashes = FileHashCache::new();

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for path in event.paths {
                let Some(rel) = relative_str(&async_root, &path) else {
                    continue;
                };
                if !profile.matches(&rel) {
                    continue;
                }
                // Deletions always count as changed; for live files the hash
                // cache filters out touch-without-change events.
                if path.is_file() && !hashes.has_changed(&path) {
                    debug!(rel = %rel, "content unchanged, skipping event");
                    continue;
                }

                debug!(rel = %rel, "app file changed");
                let changed = PipelineEvent::FileChanged {
                    path: PathBuf::from(&rel),
                };
                if pipeline_tx.send(changed).await.is_err() {
                    debug!("pipeline channel closed; stopping watch loop");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Falls back to canonicalizing both sides, which helps on platforms where
/// the watcher reports a different absolute prefix for the same directory
/// (symlinks, `/private/var/...` on macOS).
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(rel.to_string_lossy().replace('\\', "/"));
        }
    }

    None
}
