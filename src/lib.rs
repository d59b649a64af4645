// src/lib.rs

pub mod bundle;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod serve;
pub mod tasks;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::tasks::{PipelineBackend, run_sequence};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the task backend (bundler / dev server / watcher)
/// - the sequential task runner
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let (config, config_path) = match &args.config {
        Some(path) => {
            let path = PathBuf::from(path);
            (config::load_and_validate(&path)?, path)
        }
        None => {
            let path = config::default_config_path();
            (config::load_or_builtin(&path)?, path)
        }
    };

    let root = config_root_dir(&config_path);
    let sequence = args.task.sequence();
    info!(task = %args.task, ?sequence, "running tasks");

    let mut backend = PipelineBackend::new(root, config);
    run_sequence(&mut backend, sequence).await?;
    info!("all tasks completed");

    // Serve/watch keep running in the background; stay alive until Ctrl-C.
    if !args.once && !backend.is_idle() {
        info!("press Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        info!("shutting down");
    }

    Ok(())
}

/// Figure out a sensible project root.
///
/// - If the config path has a non-empty parent (e.g. "configs/Devloop.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Devloop.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
