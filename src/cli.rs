// src/cli.rs

//! Command-line interface for `devloop`.

use clap::{Parser, ValueEnum};

use crate::tasks::TaskKind;

/// Development pipeline: bundle a client app, serve it with live reload,
/// and rebuild on file changes.
#[derive(Debug, Parser)]
#[command(name = "devloop", version, about)]
pub struct CliArgs {
    /// Task to run. `default` runs build, serve and watch in order.
    #[arg(value_enum, default_value_t = TaskKind::Default)]
    pub task: TaskKind,

    /// Path to the configuration file. When omitted, `Devloop.toml` in the
    /// current directory is used if present, otherwise built-in defaults.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (overrides the DEVLOOP_LOG environment variable).
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Exit after the requested tasks have completed instead of keeping the
    /// server and watcher alive until Ctrl-C.
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
