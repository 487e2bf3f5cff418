//! Common test utilities for svcdeb integration tests

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use svcdeb::config::{CONFIG_FILE_NAME, PackageConfig};
use tempfile::TempDir;

/// Configuration template used by most tests
pub const CONFIG_TEMPLATE: &str = "\
name: {{project.name}}
server:
  port: {{svc.http_port}}
logging:
  directory: {{path.log_directory}}
";

/// A project directory with a package configuration, a template and an artifact
pub struct TestProject {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

impl TestProject {
    /// Create a project named `hello` with a minimal svcdeb.yaml
    pub fn new() -> Self {
        let temp = TempDir::new_in(temp_dir_base())
            .expect("Failed to create temp directory");
        let path = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp dir");
        let project = Self { temp, path };
        project.write_file("config/hello.yml", CONFIG_TEMPLATE);
        project.write_file("target/release/libhello.so", "not really a shared object");
        project.write_config("");
        project
    }

    /// Write svcdeb.yaml with `extra` appended to the minimal document
    pub fn write_config(&self, extra: &str) {
        let yaml = format!(
            "\
project:
  name: hello
  version: 1.0.0
artifact: target/release/libhello.so
config_template: config/hello.yml
deb:
  architecture: amd64
service:
  http_port: 8080
{extra}"
        );
        self.write_file(CONFIG_FILE_NAME, &yaml);
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path.join(CONFIG_FILE_NAME)
    }

    /// Load the package configuration the way the CLI does
    pub fn load(&self) -> PackageConfig {
        PackageConfig::load(&self.config_path()).expect("Failed to load svcdeb.yaml")
    }

    /// Default staging directory
    pub fn work_dir(&self) -> PathBuf {
        self.path.join("target/svcdeb-package")
    }

    /// Staged payload path of an install destination
    pub fn staged(&self, destination: &str) -> PathBuf {
        self.work_dir()
            .join("files")
            .join(destination.trim_start_matches('/'))
    }
}

/// Absolute directory for test scratch trees, even when `TMPDIR` is relative
pub fn temp_dir_base() -> PathBuf {
    let t = std::env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        PathBuf::from("/tmp")
    }
}

/// Permission bits of a file
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .expect("Failed to stat file")
        .permissions()
        .mode()
        & 0o7777
}
