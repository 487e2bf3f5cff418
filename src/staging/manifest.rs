//! Control data written next to the staged payload
//!
//! `manifest.yaml` lists every staged file in install order with the metadata the
//! payload itself cannot carry when ownership is only recorded: owner, group, mode and a
//! BLAKE3 hash of the bytes written.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::FileMode;
use crate::error::{Result, file_read_failed, file_write_failed, io_error};

use super::OwnershipMode;

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// One staged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedEntry {
    /// Absolute install destination
    pub destination: String,

    /// Where the bytes came from (path or `embedded:<name>`)
    pub source: String,

    /// Whether the bytes were rendered
    pub template: bool,

    pub owner: String,

    pub group: String,

    pub mode: FileMode,

    /// Bytes written
    pub size: u64,

    /// `blake3:<hex>` of the bytes written
    pub hash: String,
}

/// The manifest document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Whether owner and group were applied on disk or only recorded here
    pub ownership: OwnershipMode,

    pub entries: Vec<StagedEntry>,
}

impl Manifest {
    pub fn path(root: &Path) -> PathBuf {
        root.join(super::guard::MANIFEST_FILE)
    }

    pub fn write(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        let yaml = serde_yaml::to_string(self).map_err(|e| file_write_failed(&path, e))?;
        std::fs::write(&path, yaml).map_err(|e| file_write_failed(&path, e))
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        let content = std::fs::read_to_string(&path).map_err(|e| file_read_failed(&path, e))?;
        serde_yaml::from_str(&content).map_err(|e| file_read_failed(&path, e))
    }

    /// Check that `payload_root` holds exactly the listed files with the listed hashes
    pub fn verify(&self, payload_root: &Path) -> Result<()> {
        let mut expected: BTreeMap<PathBuf, &StagedEntry> = self
            .entries
            .iter()
            .map(|e| (PathBuf::from(e.destination.trim_start_matches('/')), e))
            .collect();

        let mut files = Vec::new();
        for entry in WalkDir::new(payload_root) {
            let entry = entry.map_err(|e| {
                io_error(format!(
                    "cannot read staged tree {}: {e}",
                    payload_root.display()
                ))
            })?;
            if entry.file_type().is_file() {
                files.push(entry);
            }
        }
        files.sort_by_key(|e| e.path().to_path_buf());

        for entry in files {
            let relative = entry
                .path()
                .strip_prefix(payload_root)
                .unwrap_or(entry.path())
                .to_path_buf();
            let Some(listed) = expected.remove(&relative) else {
                return Err(io_error(format!(
                    "staged file '/{}' is not listed in the manifest",
                    relative.display()
                )));
            };
            let actual = hash_file(entry.path())?;
            if actual != listed.hash {
                return Err(io_error(format!(
                    "staged file '{}' does not match its manifest hash",
                    listed.destination
                )));
            }
        }

        if let Some(missing) = expected.values().next() {
            return Err(io_error(format!(
                "manifest lists '{}' but it was not staged",
                missing.destination
            )));
        }
        Ok(())
    }
}

/// BLAKE3 hash of in-memory bytes
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{}{}", HASH_PREFIX, blake3::hash(bytes).to_hex())
}

/// BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| file_read_failed(path, e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| file_read_failed(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}
