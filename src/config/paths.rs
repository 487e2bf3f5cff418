//! Filesystem layout of the installed service

use serde::{Deserialize, Serialize};

/// Path section of svcdeb.yaml; unset entries are derived from the package name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_config_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstart_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systemv_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systemd_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_script: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_directory: Option<String>,
}

/// Resolved install layout, exposed to templates under `path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub config_file: String,
    pub runtime_config_file: String,
    pub upstart_file: String,
    pub systemv_file: String,
    pub systemd_file: String,
    pub start_script: String,
    pub artifact_file: String,
    pub log_directory: String,
}

impl PathConfig {
    /// Resolve the layout for `package` whose artifact is named `artifact_name`
    pub fn resolve(&self, package: &str, artifact_name: &str) -> Layout {
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);

        Layout {
            config_file: pick(&self.config_file, format!("/etc/{package}/{package}.yml")),
            runtime_config_file: pick(
                &self.runtime_config_file,
                format!("/etc/{package}/runtime.env"),
            ),
            upstart_file: pick(&self.upstart_file, format!("/etc/init/{package}.conf")),
            systemv_file: pick(&self.systemv_file, format!("/etc/init.d/{package}")),
            systemd_file: pick(
                &self.systemd_file,
                format!("/lib/systemd/system/{package}.service"),
            ),
            start_script: pick(&self.start_script, format!("/opt/{package}/bin/start.sh")),
            artifact_file: pick(
                &self.artifact_file,
                format!("/opt/{package}/lib/{artifact_name}"),
            ),
            log_directory: pick(&self.log_directory, format!("/var/log/{package}")),
        }
    }
}
