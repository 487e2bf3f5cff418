//! Resource model: one logical file destined for the installed bundle
//!
//! A **Resource** carries where its bytes come from, whether those bytes are a
//! template, the absolute install destination, and the owner/group/mode the file is
//! installed with. Where the bytes come from is the only thing that differs between
//! variants; destination and metadata handling is uniform.
//!
//! - [`embedded`]: operational files compiled into svcdeb itself
//! - [`producer`]: resources synthesized from user-declared rules
//! - [`list`]: the ordered, destination-unique list handed to staging

pub mod embedded;
pub mod list;
pub mod producer;

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{FileMode, UnixIdentity};
use crate::error::{Result, file_read_failed, invalid_destination};

pub use embedded::EmbeddedAsset;
pub use list::{ResourceList, build_resource_list};
pub use producer::produce;

/// Where a resource's bytes come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "location")]
pub enum ResourceSource {
    /// A file on the local filesystem
    File(PathBuf),
    /// A file packaged inside svcdeb
    Embedded(EmbeddedAsset),
}

impl fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceSource::File(path) => write!(f, "{}", path.display()),
            ResourceSource::Embedded(asset) => write!(f, "embedded:{}", asset.file_name()),
        }
    }
}

/// A file to install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub source: ResourceSource,

    /// Render through the template engine before writing
    pub template: bool,

    /// Absolute install path (e.g. `/etc/hello/hello.yml`)
    pub destination: String,

    pub owner: String,

    pub group: String,

    pub mode: FileMode,
}

impl Resource {
    pub fn new(
        source: ResourceSource,
        template: bool,
        destination: impl Into<String>,
        identity: &UnixIdentity,
        mode: u32,
    ) -> Self {
        Self {
            source,
            template,
            destination: destination.into(),
            owner: identity.user.clone(),
            group: identity.group.clone(),
            mode: FileMode::new(mode),
        }
    }

    /// A resource read from the local filesystem
    pub fn file(
        path: impl Into<PathBuf>,
        template: bool,
        destination: impl Into<String>,
        identity: &UnixIdentity,
        mode: u32,
    ) -> Self {
        Self::new(
            ResourceSource::File(path.into()),
            template,
            destination,
            identity,
            mode,
        )
    }

    /// A resource packaged with svcdeb
    pub fn embedded(
        asset: EmbeddedAsset,
        template: bool,
        destination: impl Into<String>,
        identity: &UnixIdentity,
        mode: u32,
    ) -> Self {
        Self::new(
            ResourceSource::Embedded(asset),
            template,
            destination,
            identity,
            mode,
        )
    }

    /// Destination relative to the payload root (no leading slash)
    pub fn relative_destination(&self) -> &Path {
        Path::new(self.destination.trim_start_matches('/'))
    }

    /// Human label used in diagnostics
    pub fn label(&self) -> String {
        self.source.to_string()
    }

    /// Read the source bytes
    pub fn read_source(&self) -> Result<Cow<'static, [u8]>> {
        match &self.source {
            ResourceSource::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|e| file_read_failed(path, e)),
            ResourceSource::Embedded(asset) => Ok(Cow::Borrowed(asset.contents().as_bytes())),
        }
    }

    /// Destinations are absolute, name a file, and never climb out of the root
    pub fn validate_destination(&self) -> Result<()> {
        let destination = &self.destination;
        if !destination.starts_with('/') {
            return Err(invalid_destination(destination, "must be an absolute path"));
        }
        if destination.ends_with('/') || self.relative_destination().as_os_str().is_empty() {
            return Err(invalid_destination(destination, "must name a file"));
        }
        let escapes = destination
            .split('/')
            .any(|segment| segment == "." || segment == "..");
        if escapes {
            return Err(invalid_destination(
                destination,
                "must not contain '.' or '..' components",
            ));
        }
        Ok(())
    }
}
