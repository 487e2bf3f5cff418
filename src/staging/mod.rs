//! Staging engine: materialize a resource list into a payload tree
//!
//! Layout of a staged tree:
//!
//! ```text
//! <root>/
//!   manifest.yaml        control data (owner, group, mode, hash per file)
//!   files/<destination>  payload, one file per resource
//! ```
//!
//! Each resource is read, rendered when it is a template, written, and given its mode.
//! The first failure aborts the run and the [`guard::StagingGuard`] removes the partially
//! written tree.

pub mod guard;
pub mod manifest;
pub mod ownership;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, file_read_failed, file_write_failed};
use crate::params::ParameterContext;
use crate::report::Reporter;
use crate::resource::{Resource, ResourceList};
use crate::template;

pub use guard::StagingGuard;
pub use manifest::{Manifest, StagedEntry, hash_bytes};

/// Directory below the staging root that holds the payload
pub const PAYLOAD_DIR: &str = "files";

/// What happens to a resource's owner and group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipMode {
    /// Write owner and group into the manifest only; the assembler applies them
    #[default]
    Record,
    /// Also `chown` every staged file (requires privileges)
    Apply,
}

/// Knobs for one staging run
#[derive(Debug, Clone, Default)]
pub struct StagingOptions {
    pub ownership: OwnershipMode,
}

/// Result of a successful staging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTree {
    pub root: PathBuf,
    pub payload_root: PathBuf,
    pub entries: Vec<StagedEntry>,
}

impl StagedTree {
    pub fn manifest_path(&self) -> PathBuf {
        Manifest::path(&self.root)
    }

    /// On-disk path of a staged destination
    pub fn payload_path(&self, destination: &str) -> PathBuf {
        self.payload_root.join(destination.trim_start_matches('/'))
    }
}

/// Stage every resource below `root`
pub fn extract(
    resources: &ResourceList,
    root: &Path,
    context: &ParameterContext,
    options: &StagingOptions,
    reporter: &dyn Reporter,
) -> Result<StagedTree> {
    let guard = StagingGuard::create(root)?;
    let payload_root = guard.root().join(PAYLOAD_DIR);
    fs::create_dir_all(&payload_root).map_err(|e| file_write_failed(&payload_root, e))?;

    reporter.info(&format!(
        "Staging {} resource(s) into {}",
        resources.len(),
        payload_root.display()
    ));

    let mut entries = Vec::with_capacity(resources.len());
    for resource in resources {
        entries.push(stage_resource(resource, &payload_root, context, options, reporter)?);
    }

    let manifest = Manifest {
        ownership: options.ownership,
        entries,
    };
    manifest.write(guard.root())?;

    let root = guard.commit();
    Ok(StagedTree {
        root,
        payload_root,
        entries: manifest.entries,
    })
}

fn stage_resource(
    resource: &Resource,
    payload_root: &Path,
    context: &ParameterContext,
    options: &StagingOptions,
    reporter: &dyn Reporter,
) -> Result<StagedEntry> {
    let target = payload_root.join(resource.relative_destination());
    let label = resource.label();

    let raw = resource.read_source()?;
    let bytes = if resource.template {
        let text = std::str::from_utf8(&raw).map_err(|e| {
            file_read_failed(Path::new(&label), format!("template is not UTF-8: {e}"))
        })?;
        template::render(&label, text, context)?.into_bytes()
    } else {
        raw.into_owned()
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| file_write_failed(parent, e))?;
    }
    fs::write(&target, &bytes).map_err(|e| file_write_failed(&target, e))?;
    ownership::apply_mode(&target, resource.mode)?;
    if options.ownership == OwnershipMode::Apply {
        ownership::apply_owner(&target, &resource.owner, &resource.group)?;
    }

    reporter.debug(&format!(
        "{} -> {} ({}:{} {})",
        label, resource.destination, resource.owner, resource.group, resource.mode
    ));

    Ok(StagedEntry {
        destination: resource.destination.clone(),
        source: label,
        template: resource.template,
        owner: resource.owner.clone(),
        group: resource.group.clone(),
        mode: resource.mode,
        size: bytes.len() as u64,
        hash: hash_bytes(&bytes),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::UnixIdentity;
    use crate::params::ParameterContextBuilder;
    use crate::report::{Level, RecordingReporter};
    use crate::resource::EmbeddedAsset;
    use serde_json::json;
    use std::os::unix::fs::MetadataExt;
    use tempfile::TempDir;

    fn context() -> ParameterContext {
        let mut builder = ParameterContextBuilder::default();
        builder.insert_value("svc", json!({"port": 8080}));
        builder.build()
    }

    #[test]
    fn test_template_and_verbatim_resources() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let source = temp.path().join("app.yml");
        fs::write(&source, "port: {{svc.port}}\n").unwrap();
        let list = ResourceList::new(vec![
            Resource::file(&source, true, "/etc/app/app.yml", &UnixIdentity::new("app", "app"), 0o600),
            Resource::embedded(
                EmbeddedAsset::StartScript,
                false,
                "/opt/app/bin/start.sh",
                &UnixIdentity::root(),
                0o755,
            ),
        ])
        .unwrap();
        let root = temp.path().join("work");
        let reporter = RecordingReporter::new();

        let tree = extract(&list, &root, &context(), &StagingOptions::default(), &reporter).unwrap();

        let config = tree.payload_path("/etc/app/app.yml");
        assert_eq!(fs::read_to_string(&config).unwrap(), "port: 8080\n");
        assert_eq!(fs::metadata(&config).unwrap().mode() & 0o7777, 0o600);

        let start = tree.payload_path("/opt/app/bin/start.sh");
        assert_eq!(
            fs::read_to_string(&start).unwrap(),
            EmbeddedAsset::StartScript.contents()
        );
        assert_eq!(fs::metadata(&start).unwrap().mode() & 0o7777, 0o755);

        assert_eq!(tree.entries.len(), 2);
        assert_eq!(tree.entries[0].owner, "app");
        assert!(tree.manifest_path().is_file());
        assert!(reporter.contains(Level::Info, "Staging 2 resource(s)"));
    }

    #[test]
    fn test_failed_render_removes_partial_tree() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let good = temp.path().join("good.txt");
        let bad = temp.path().join("bad.txt");
        fs::write(&good, "fine").unwrap();
        fs::write(&bad, "{{svc.missing}}").unwrap();
        let list = ResourceList::new(vec![
            Resource::file(&good, false, "/etc/good", &UnixIdentity::root(), 0o644),
            Resource::file(&bad, true, "/etc/bad", &UnixIdentity::root(), 0o644),
        ])
        .unwrap();
        let root = temp.path().join("work");

        let err = extract(
            &list,
            &root,
            &context(),
            &StagingOptions::default(),
            &RecordingReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(err, crate::error::SvcdebError::TemplateRender { .. }));
        assert!(!root.exists());
    }

    #[test]
    fn test_non_utf8_template_rejected() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let source = temp.path().join("blob");
        fs::write(&source, [0xff, 0xfe, 0x00]).unwrap();
        let list = ResourceList::new(vec![Resource::file(
            &source,
            true,
            "/etc/blob",
            &UnixIdentity::root(),
            0o644,
        )])
        .unwrap();

        let err = extract(
            &list,
            &temp.path().join("work"),
            &context(),
            &StagingOptions::default(),
            &RecordingReporter::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not UTF-8"));
    }

    #[test]
    fn test_rerun_replaces_previous_tree() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let source = temp.path().join("a");
        fs::write(&source, "a").unwrap();
        let root = temp.path().join("work");
        let first = ResourceList::new(vec![Resource::file(
            &source,
            false,
            "/etc/first",
            &UnixIdentity::root(),
            0o644,
        )])
        .unwrap();
        let second = ResourceList::new(vec![Resource::file(
            &source,
            false,
            "/etc/second",
            &UnixIdentity::root(),
            0o644,
        )])
        .unwrap();
        let reporter = RecordingReporter::new();

        extract(&first, &root, &context(), &StagingOptions::default(), &reporter).unwrap();
        let tree = extract(&second, &root, &context(), &StagingOptions::default(), &reporter).unwrap();

        assert!(!tree.payload_path("/etc/first").exists());
        assert!(tree.payload_path("/etc/second").exists());
        Manifest::load(&tree.root).unwrap().verify(&tree.payload_root).unwrap();
    }
}
