//! The ordered resource list handed to staging
//!
//! Construction is where every destination check happens: destinations must be
//! well-formed, unique and never nested under one another, so a bad list never
//! reaches the filesystem.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{PackageConfig, UnixIdentity};
use crate::error::{Result, duplicate_destination, nested_destination, source_not_found};

use super::{EmbeddedAsset, Resource, ResourceSource, produce};

/// Mode of the rendered service configuration
const CONFIG_MODE: u32 = 0o640;
/// Mode of the installed artifact and of non-executable service files
const FILE_MODE: u32 = 0o644;
/// Mode of init and start scripts
const SCRIPT_MODE: u32 = 0o755;

/// Resources in install order with unique destinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceList {
    resources: Vec<Resource>,
}

impl ResourceList {
    /// Validate destinations and reject duplicates, naming both claimants
    pub fn new(resources: Vec<Resource>) -> Result<Self> {
        let mut seen: HashMap<PathBuf, usize> = HashMap::with_capacity(resources.len());
        for (index, resource) in resources.iter().enumerate() {
            resource.validate_destination()?;
            let key = resource.relative_destination().to_path_buf();
            if let Some(&first) = seen.get(&key) {
                return Err(duplicate_destination(
                    &resource.destination,
                    resources[first].label(),
                    resource.label(),
                ));
            }
            seen.insert(key, index);
        }

        // A file destination cannot also be a directory on another file's path.
        for resource in &resources {
            let nested_under = resource
                .relative_destination()
                .ancestors()
                .skip(1)
                .find_map(|ancestor| seen.get(ancestor));
            if let Some(&parent) = nested_under {
                let parent = &resources[parent];
                return Err(nested_destination(
                    &parent.destination,
                    &resource.destination,
                    parent.label(),
                    resource.label(),
                ));
            }
        }
        Ok(Self { resources })
    }

    /// Every file-backed source must exist before staging starts
    pub fn check_sources(&self) -> Result<()> {
        for resource in &self.resources {
            if let ResourceSource::File(path) = &resource.source {
                if !path.is_file() {
                    return Err(source_not_found(path.display().to_string()));
                }
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn as_slice(&self) -> &[Resource] {
        &self.resources
    }
}

impl<'a> IntoIterator for &'a ResourceList {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// Build the fixed service files plus every user rule for `config`
///
/// Order: configuration, runtime environment, upstart job, SysV script, systemd
/// unit, start script, artifact, then `files:` rules in declaration order.
pub fn build_resource_list(config: &PackageConfig) -> Result<ResourceList> {
    let layout = config.layout();
    let service = config.unix_identity();
    let root = UnixIdentity::root();

    let mut resources = vec![
        Resource::file(
            config.config_template.clone(),
            true,
            layout.config_file,
            &service,
            CONFIG_MODE,
        ),
        Resource::embedded(
            EmbeddedAsset::RuntimeEnv,
            true,
            layout.runtime_config_file,
            &root,
            FILE_MODE,
        ),
        Resource::embedded(
            EmbeddedAsset::Upstart,
            true,
            layout.upstart_file,
            &root,
            FILE_MODE,
        ),
        Resource::embedded(
            EmbeddedAsset::SystemV,
            true,
            layout.systemv_file,
            &root,
            SCRIPT_MODE,
        ),
        Resource::embedded(
            EmbeddedAsset::Systemd,
            true,
            layout.systemd_file,
            &root,
            FILE_MODE,
        ),
        Resource::embedded(
            EmbeddedAsset::StartScript,
            true,
            layout.start_script,
            &root,
            SCRIPT_MODE,
        ),
        Resource::file(
            config.artifact.clone(),
            false,
            layout.artifact_file,
            &service,
            FILE_MODE,
        ),
    ];
    for rule in &config.files {
        resources.push(produce(rule, &service)?);
    }

    let list = ResourceList::new(resources)?;
    list.check_sources()?;
    Ok(list)
}
