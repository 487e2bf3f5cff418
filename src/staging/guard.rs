//! Rollback guard for a staging run
//!
//! The guard owns the freshly created work directory until the run commits. If it is
//! dropped uncommitted (an error returned early, a panic unwound) the whole partially
//! written tree is removed, so a failed run never leaves a half-staged payload behind.
//!
//! ```ignore
//! let guard = StagingGuard::create(root)?;
//! // write files below guard.root()...
//! guard.commit();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, config_invalid, file_write_failed};

/// File that marks a directory as a previous staging tree
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Owns the work directory of one staging run
#[derive(Debug)]
pub struct StagingGuard {
    root: PathBuf,

    /// Whether the staged tree has been handed over
    committed: bool,

    /// Whether rollback is enabled (can be disabled for testing)
    rollback_enabled: bool,
}

impl StagingGuard {
    /// Wipe `root` if it holds a previous staging tree, then create it empty
    ///
    /// A non-empty directory without a manifest is refused rather than wiped.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.exists() {
            if !is_replaceable(&root) {
                return Err(config_invalid(format!(
                    "work directory '{}' is not empty and holds no {MANIFEST_FILE}; refusing to wipe it",
                    root.display()
                )));
            }
            fs::remove_dir_all(&root).map_err(|e| file_write_failed(&root, e))?;
        }
        fs::create_dir_all(&root).map_err(|e| file_write_failed(&root, e))?;
        Ok(Self {
            root,
            committed: false,
            rollback_enabled: true,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keep the staged tree
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        std::mem::take(&mut self.root)
    }

    #[cfg(test)]
    fn disable_rollback(&mut self) {
        self.rollback_enabled = false;
    }

    /// Remove the tree unless committed
    pub fn rollback(&mut self) -> Result<()> {
        if self.committed || !self.root.exists() {
            return Ok(());
        }
        fs::remove_dir_all(&self.root).map_err(|e| file_write_failed(&self.root, e))
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if !self.committed && self.rollback_enabled {
            if let Err(e) = self.rollback() {
                tracing::warn!("Rollback of staging tree failed: {e}");
            }
        }
    }
}

fn is_replaceable(root: &Path) -> bool {
    if root.join(MANIFEST_FILE).is_file() {
        return true;
    }
    fs::read_dir(root)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
