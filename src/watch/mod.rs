// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the `[paths].app` glob patterns into a watch profile.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Content hashing so events that don't change file contents are dropped.
//!
//! It does **not** know how changes are acted on; it only turns filesystem
//! events into pipeline-level triggers.

pub mod hash;
pub mod patterns;
pub mod watcher;

pub use hash::{compute_file_hash, FileHashCache};
pub use patterns::{build_watch_profile, WatchProfile};
pub use watcher::{spawn_watcher, WatcherHandle};
