//! Project identity as supplied by the build

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config_invalid};

/// Project section of svcdeb.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name, also the default package name
    pub name: String,

    /// Project version
    pub version: String,

    /// One-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Project homepage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Build output directory; the staging work dir lives below it
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Dependencies the project was built with
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// A dependency declared by the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    /// Crate or library name
    pub name: String,

    /// Version requirement as written by the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("target")
}

impl ProjectConfig {
    /// Create a project with the default build directory and no dependencies
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            url: None,
            build_dir: default_build_dir(),
            dependencies: Vec::new(),
        }
    }

    /// Find a declared dependency by name
    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|dep| dep.name == name)
    }

    /// Validate project identity
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(config_invalid("project.name must not be empty"));
        }
        if self.version.trim().is_empty() {
            return Err(config_invalid("project.version must not be empty"));
        }
        if let Some(dep) = self.dependencies.iter().find(|d| d.name.trim().is_empty()) {
            return Err(config_invalid(format!(
                "project.dependencies contains an entry without a name (version {:?})",
                dep.version
            )));
        }
        Ok(())
    }
}
