// src/watch/hash.rs

//! Content hashing for change detection.
//!
//! Editors and build tools frequently touch files without changing their
//! contents; hashing lets the watcher drop those events instead of kicking
//! off a rebuild.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blake3::Hasher;

/// Compute the hash of a single file.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = File::open(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// In-memory per-file content hashes for the current session.
#[derive(Debug, Default)]
pub struct FileHashCache {
    map: HashMap<PathBuf, String>,
}

impl FileHashCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the file's content differs from what was last seen,
    /// recording the new hash. Files seen for the first time count as
    /// changed; unreadable files count as changed and lose their stale entry.
    pub fn has_changed(&mut self, path: &Path) -> bool {
        match compute_file_hash(path) {
            Ok(hash) => match self.map.insert(path.to_path_buf(), hash.clone()) {
                Some(prev) => prev != hash,
                None => true,
            },
            Err(_) => {
                self.map.remove(path);
                true
            }
        }
    }
}
