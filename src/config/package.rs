//! Package configuration (svcdeb.yaml)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    DebConfig, DebMetadata, Layout, PathConfig, ProjectConfig, ResourceRule, RuntimeConfig,
    UnixConfig, UnixIdentity,
};
use crate::error::{
    Result, config_invalid, config_not_found, config_parse_failed, file_read_failed,
};

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "svcdeb.yaml";

/// Name of the per-run staging directory below the build directory
const WORKING_DIRECTORY_NAME: &str = "svcdeb-package";

/// Top-level package configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    pub project: ProjectConfig,

    /// Compiled service artifact (shared object)
    pub artifact: PathBuf,

    /// Configuration template installed at `path.config_file`
    pub config_template: PathBuf,

    /// Bundle output file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Validate the rendered configuration against the artifact
    #[serde(default = "default_validate")]
    pub validate: bool,

    #[serde(default)]
    pub deb: DebConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub unix: UnixConfig,

    #[serde(default)]
    pub path: PathConfig,

    /// Free-form template values, exposed as `service.*` and `svc.*`
    #[serde(default)]
    pub service: BTreeMap<String, serde_json::Value>,

    /// Additional files to install
    #[serde(default)]
    pub files: Vec<ResourceRule>,

    /// Signing settings, passed through to the bundle assembler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningConfig>,
}

/// Signing key reference for the assembler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningConfig {
    /// Key id or fingerprint
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyring: Option<PathBuf>,

    /// Environment variable holding the passphrase; never the passphrase itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase_env: Option<String>,
}

fn default_validate() -> bool {
    true
}

impl PackageConfig {
    /// Create a minimal configuration; used by tests and embedders
    pub fn new(
        project: ProjectConfig,
        artifact: impl Into<PathBuf>,
        config_template: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project,
            artifact: artifact.into(),
            config_template: config_template.into(),
            output: None,
            validate: true,
            deb: DebConfig::default(),
            runtime: RuntimeConfig::default(),
            unix: UnixConfig::default(),
            path: PathConfig::default(),
            service: BTreeMap::new(),
            files: Vec::new(),
            signing: None,
        }
    }

    /// Load, resolve relative paths against the file's directory, and validate
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(config_not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| file_read_failed(path, e))?;
        let mut config = Self::from_yaml(&content)
            .map_err(|e| config_parse_failed(path.display().to_string(), e.to_string()))?;

        let base = dunce::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        config.resolve_relative_to(&base);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without resolving paths
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Make every relative path absolute against `base`
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let absolutize = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        absolutize(&mut self.artifact);
        absolutize(&mut self.config_template);
        absolutize(&mut self.project.build_dir);
        if let Some(output) = self.output.as_mut() {
            absolutize(output);
        }
        for rule in &mut self.files {
            absolutize(&mut rule.source);
        }
    }

    /// Validate the shape of the configuration
    pub fn validate(&self) -> Result<()> {
        self.project.validate()?;
        self.deb.resolve(&self.project)?;
        if self.artifact.file_name().is_none() {
            return Err(config_invalid(format!(
                "artifact '{}' does not name a file",
                self.artifact.display()
            )));
        }
        for (index, rule) in self.files.iter().enumerate() {
            if rule.target.trim().is_empty() {
                return Err(config_invalid(format!("files[{index}].target is empty")));
            }
        }
        if let Some(key) = self.service.keys().find(|k| k.is_empty() || k.contains('.')) {
            return Err(config_invalid(format!(
                "service key '{key}' must be non-empty and must not contain '.'"
            )));
        }
        Ok(())
    }

    /// Resolved Debian metadata
    pub fn deb_metadata(&self) -> Result<DebMetadata> {
        self.deb.resolve(&self.project)
    }

    /// Package name used for the layout and default identity
    pub fn package_name(&self) -> String {
        self.deb
            .name
            .clone()
            .unwrap_or_else(|| self.project.name.clone())
    }

    /// File name of the artifact as installed
    pub fn artifact_name(&self) -> String {
        self.artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Run-as identity applied to service-owned files
    pub fn unix_identity(&self) -> UnixIdentity {
        self.unix.resolve(&self.package_name())
    }

    /// Resolved install layout
    pub fn layout(&self) -> Layout {
        self.path
            .resolve(&self.package_name(), &self.artifact_name())
    }

    /// Per-run staging directory
    pub fn work_dir(&self) -> PathBuf {
        self.project.build_dir.join(WORKING_DIRECTORY_NAME)
    }

    /// Output bundle path
    pub fn output_file(&self) -> Result<PathBuf> {
        if let Some(output) = &self.output {
            return Ok(output.clone());
        }
        let meta = self.deb_metadata()?;
        Ok(self.project.build_dir.join(format!(
            "{}_{}_{}.deb",
            meta.name, meta.version, meta.architecture
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r"
project:
  name: hello
  version: 1.0.0
artifact: target/release/libhello.so
config_template: config/hello.yml
";

    #[test]
    fn test_minimal_config_defaults() {
        let config = PackageConfig::from_yaml(MINIMAL).unwrap();
        assert!(config.validate);
        assert!(config.files.is_empty());
        assert_eq!(config.package_name(), "hello");
        assert_eq!(config.artifact_name(), "libhello.so");
        assert_eq!(config.unix_identity(), UnixIdentity::new("hello", "hello"));
        assert_eq!(config.layout().artifact_file, "/opt/hello/lib/libhello.so");
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let yaml = format!("{MINIMAL}jvm:\n  memory: 128m\n");
        assert!(PackageConfig::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_resolve_relative_paths() {
        let mut config = PackageConfig::from_yaml(MINIMAL).unwrap();
        config.files.push(ResourceRule::new("extra/a.conf", "/etc/a.conf"));
        config.files.push(ResourceRule::new("/abs/b.conf", "/etc/b.conf"));
        config.resolve_relative_to(Path::new("/work/hello"));
        assert_eq!(
            config.artifact,
            PathBuf::from("/work/hello/target/release/libhello.so")
        );
        assert_eq!(
            config.config_template,
            PathBuf::from("/work/hello/config/hello.yml")
        );
        assert_eq!(config.project.build_dir, PathBuf::from("/work/hello/target"));
        assert_eq!(
            config.files[0].source,
            PathBuf::from("/work/hello/extra/a.conf")
        );
        assert_eq!(config.files[1].source, PathBuf::from("/abs/b.conf"));
        assert_eq!(
            config.work_dir(),
            PathBuf::from("/work/hello/target/svcdeb-package")
        );
    }

    #[test]
    fn test_output_file_default() {
        let mut config = PackageConfig::from_yaml(MINIMAL).unwrap();
        config.deb.architecture = Some("amd64".to_string());
        config.resolve_relative_to(Path::new("/w"));
        assert_eq!(
            config.output_file().unwrap(),
            PathBuf::from("/w/target/hello_1.0.0_amd64.deb")
        );
    }

    #[test]
    fn test_service_key_with_dot_rejected() {
        let yaml = format!("{MINIMAL}service:\n  http.port: 8080\n");
        let config = PackageConfig::from_yaml(&yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http.port"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PackageConfig::load(Path::new("/nonexistent/svcdeb.yaml")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::SvcdebError::ConfigNotFound { .. }
        ));
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let temp = tempfile::TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "project: [unclosed").unwrap();
        let err = PackageConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_resolves_against_config_directory() {
        let temp = tempfile::TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, MINIMAL).unwrap();
        let config = PackageConfig::load(&path).unwrap();
        let base = dunce::canonicalize(temp.path()).unwrap();
        assert_eq!(config.config_template, base.join("config/hello.yml"));
    }
}
