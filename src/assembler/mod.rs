//! Bundle assembler boundary
//!
//! svcdeb stops at a staged tree. Turning it into an archive (and signing it) is the
//! job of a [`BundleAssembler`]. [`HandoffAssembler`] writes a description of the staged
//! tree for an external archiver to pick up.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{DebMetadata, SigningConfig};
use crate::error::{Result, assembly_failed};
use crate::resource::ResourceList;
use crate::staging::StagedTree;

/// Everything an assembler needs to produce the bundle
#[derive(Debug, Clone)]
pub struct AssemblyRequest<'a> {
    pub resources: &'a ResourceList,
    pub staged: &'a StagedTree,
    pub package: DebMetadata,
    pub output: PathBuf,
    pub signing: Option<SigningConfig>,
}

/// Produces the final bundle from a staged tree
pub trait BundleAssembler {
    /// Assemble the bundle, returning the path of what was written
    fn assemble(&self, request: &AssemblyRequest<'_>) -> Result<PathBuf>;
}

/// Suffix appended to the output path for the hand-off document
pub const HANDOFF_SUFFIX: &str = "handoff.yaml";

/// Writes `<output>.handoff.yaml` describing the staged bundle
#[derive(Debug, Clone, Copy, Default)]
pub struct HandoffAssembler;

#[derive(Serialize)]
struct Handoff<'a> {
    output: &'a Path,
    staged_root: &'a Path,
    payload_root: &'a Path,
    manifest: PathBuf,
    package: &'a DebMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    signing: Option<&'a SigningConfig>,
    resources: &'a ResourceList,
}

impl HandoffAssembler {
    pub fn handoff_path(output: &Path) -> PathBuf {
        let mut name = output.as_os_str().to_owned();
        name.push(".");
        name.push(HANDOFF_SUFFIX);
        PathBuf::from(name)
    }
}

impl BundleAssembler for HandoffAssembler {
    fn assemble(&self, request: &AssemblyRequest<'_>) -> Result<PathBuf> {
        let handoff = Handoff {
            output: &request.output,
            staged_root: &request.staged.root,
            payload_root: &request.staged.payload_root,
            manifest: request.staged.manifest_path(),
            package: &request.package,
            signing: request.signing.as_ref(),
            resources: request.resources,
        };
        let path = Self::handoff_path(&request.output);
        let yaml = serde_yaml::to_string(&handoff)
            .map_err(|e| assembly_failed(format!("cannot describe bundle: {e}")))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                assembly_failed(format!("cannot create {}: {e}", parent.display()))
            })?;
        }
        std::fs::write(&path, yaml)
            .map_err(|e| assembly_failed(format!("cannot write {}: {e}", path.display())))?;
        Ok(path)
    }
}
