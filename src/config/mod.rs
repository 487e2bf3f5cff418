//! Configuration file handling for svcdeb
//!
//! This module contains data structures for `svcdeb.yaml`, the package description
//! handed over by the build:
//! - [`package`]: top-level document, loading and path resolution
//! - [`project`]: project identity and declared dependencies
//! - [`deb`]: Debian package metadata
//! - [`runtime`]: runtime tuning rendered into the service environment file
//! - [`unix`]: run-as identity for installed files
//! - [`paths`]: filesystem layout of the installed service
//! - [`resource`]: user-declared resource rules

pub mod deb;
pub mod package;
pub mod paths;
pub mod project;
pub mod resource;
pub mod runtime;
pub mod unix;

// Re-export commonly used types
pub use deb::{DebConfig, DebMetadata};
pub use package::{CONFIG_FILE_NAME, PackageConfig, SigningConfig};
pub use paths::{Layout, PathConfig};
pub use project::{Dependency, ProjectConfig};
pub use resource::{FileMode, ResourceRule};
pub use runtime::RuntimeConfig;
pub use unix::{UnixConfig, UnixIdentity};
