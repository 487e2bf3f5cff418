//! Operational files compiled into svcdeb

use serde::{Deserialize, Serialize};

const RUNTIME_ENV: &str = include_str!("../../assets/files/runtime.env");
const UPSTART_CONF: &str = include_str!("../../assets/files/upstart.conf");
const SYSTEMV_SH: &str = include_str!("../../assets/files/systemv.sh");
const SYSTEMD_SERVICE: &str = include_str!("../../assets/files/systemd.service");
const START_SH: &str = include_str!("../../assets/files/start.sh");

/// A bundled service-manager or startup file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedAsset {
    /// Environment file sourced by the init scripts
    RuntimeEnv,
    /// Upstart job
    Upstart,
    /// SysV init script
    SystemV,
    /// systemd unit
    Systemd,
    /// Service start script
    StartScript,
}

impl EmbeddedAsset {
    pub const ALL: [EmbeddedAsset; 5] = [
        EmbeddedAsset::RuntimeEnv,
        EmbeddedAsset::Upstart,
        EmbeddedAsset::SystemV,
        EmbeddedAsset::Systemd,
        EmbeddedAsset::StartScript,
    ];

    /// File name under `assets/files`
    pub fn file_name(self) -> &'static str {
        match self {
            EmbeddedAsset::RuntimeEnv => "runtime.env",
            EmbeddedAsset::Upstart => "upstart.conf",
            EmbeddedAsset::SystemV => "systemv.sh",
            EmbeddedAsset::Systemd => "systemd.service",
            EmbeddedAsset::StartScript => "start.sh",
        }
    }

    pub fn contents(self) -> &'static str {
        match self {
            EmbeddedAsset::RuntimeEnv => RUNTIME_ENV,
            EmbeddedAsset::Upstart => UPSTART_CONF,
            EmbeddedAsset::SystemV => SYSTEMV_SH,
            EmbeddedAsset::Systemd => SYSTEMD_SERVICE,
            EmbeddedAsset::StartScript => START_SH,
        }
    }

    /// Whether the installed file must be executable
    pub fn is_executable(self) -> bool {
        matches!(self, EmbeddedAsset::SystemV | EmbeddedAsset::StartScript)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{PackageConfig, ProjectConfig};
    use crate::params::ParameterContext;

    #[test]
    fn test_every_asset_renders_against_default_context() {
        let config = PackageConfig::new(
            ProjectConfig::new("hello", "1.0.0"),
            "/build/libhello.so",
            "/src/hello.yml",
        );
        let context = ParameterContext::from_config(&config).unwrap();
        for asset in EmbeddedAsset::ALL {
            let rendered = crate::template::render(asset.file_name(), asset.contents(), &context);
            assert!(rendered.is_ok(), "{} failed: {:?}", asset.file_name(), rendered);
        }
    }

    #[test]
    fn test_scripts_have_shebang() {
        for asset in EmbeddedAsset::ALL.into_iter().filter(|a| a.is_executable()) {
            assert!(asset.contents().starts_with("#!/bin/sh"));
        }
    }
}
