//! Debian package metadata

use serde::{Deserialize, Serialize};

use super::ProjectConfig;
use crate::error::{Result, config_invalid};

/// Deb section of svcdeb.yaml; every field falls back to a project-derived default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,

    #[serde(default)]
    pub depends: Vec<String>,
}

/// Fully resolved package metadata, as exposed to templates under `deb`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebMetadata {
    pub name: String,
    pub version: String,
    pub maintainer: String,
    pub section: String,
    pub priority: String,
    pub architecture: String,
    pub depends: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl DebConfig {
    /// Resolve against the project, filling every unset field
    pub fn resolve(&self, project: &ProjectConfig) -> Result<DebMetadata> {
        let name = self.name.clone().unwrap_or_else(|| project.name.clone());
        validate_package_name(&name)?;

        Ok(DebMetadata {
            version: self
                .version
                .clone()
                .unwrap_or_else(|| project.version.clone()),
            maintainer: self
                .maintainer
                .clone()
                .unwrap_or_else(|| format!("{name} maintainers <root@localhost>")),
            section: self.section.clone().unwrap_or_else(|| "misc".to_string()),
            priority: self
                .priority
                .clone()
                .unwrap_or_else(|| "optional".to_string()),
            architecture: self
                .architecture
                .clone()
                .unwrap_or_else(|| host_architecture().to_string()),
            depends: self.depends.clone(),
            description: project
                .description
                .clone()
                .unwrap_or_else(|| format!("{name} service")),
            homepage: project.url.clone(),
            name,
        })
    }
}

/// Debian architecture name for the host this tool was built for
pub fn host_architecture() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "i386",
        "aarch64" => "arm64",
        "arm" => "armhf",
        "powerpc64" => "ppc64el",
        other => other,
    }
}

/// Package names: lowercase alphanumerics plus `+ - .`, at least two characters,
/// starting with an alphanumeric.
fn validate_package_name(name: &str) -> Result<()> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '-' | '.'));
    let valid_start = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

    if name.len() < 2 || !valid_chars || !valid_start {
        return Err(config_invalid(format!(
            "'{name}' is not a valid Debian package name; set deb.name explicitly"
        )));
    }
    Ok(())
}
