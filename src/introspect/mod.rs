//! Artifact introspector
//!
//! Finds the configuration type a service artifact declares, following the svcdeb
//! runtime convention:
//!
//! - [`RUNTIME_ABI_SYMBOL`]: exported `u32` static; its presence marks an artifact
//!   linked against the runtime, its value is the ABI version
//! - [`ENTRY_POINT_SYMBOL`]: `extern "C" fn() -> *const c_char` returning a NUL-terminated
//!   JSON [`EntryPoint`] with static lifetime
//!
//! The artifact is loaded into a [`loader::LoadedArtifact`] that is closed before
//! [`Introspector::locate_configuration_type`] returns; only owned data leaves it.

pub mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, descriptor_invalid, entry_point_not_found, incompatible_runtime};
use crate::report::Reporter;
use crate::validation::ConfigType;

pub use crate::validation::SkipReason;
pub use loader::LoadedArtifact;

/// Exported static marking the runtime ABI version
pub const RUNTIME_ABI_SYMBOL: &str = "SVCDEB_RUNTIME_ABI";

/// Exported function describing the service
pub const ENTRY_POINT_SYMBOL: &str = "svcdeb_entry_point";

/// ABI version this build understands
pub const RUNTIME_ABI_VERSION: u32 = 1;

/// Name under which projects declare the runtime dependency
pub const RUNTIME_DEPENDENCY: &str = "svcdeb-runtime";

/// Descriptor returned by the entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Service application name
    pub application: String,
    pub config_type: ConfigType,
}

/// Result of looking for the configuration type
#[derive(Debug, Clone, PartialEq)]
pub enum Discovery {
    Found(Box<ConfigType>),
    Skipped(SkipReason),
}

/// Read access to the symbols of a loaded artifact
pub trait SymbolSource {
    /// Value of [`RUNTIME_ABI_SYMBOL`], `None` when not exported
    fn runtime_abi(&self) -> Option<u32>;

    /// Call [`ENTRY_POINT_SYMBOL`] and copy its descriptor
    ///
    /// `None` when the symbol is not exported; `Some(Err)` when it returned
    /// something that is not a UTF-8 C string.
    fn entry_point_descriptor(&self) -> Option<std::result::Result<String, String>>;
}

/// Opens an artifact for symbol lookup
pub trait ArtifactOpener: std::fmt::Debug {
    fn open(&self, artifact: &Path) -> Result<Box<dyn SymbolSource>>;
}

/// Opens artifacts with the platform dynamic loader
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLoader;

impl ArtifactOpener for NativeLoader {
    fn open(&self, artifact: &Path) -> Result<Box<dyn SymbolSource>> {
        Ok(Box::new(LoadedArtifact::open(artifact)?))
    }
}

/// Apply the runtime convention to `source`, labelling errors with `artifact`
pub fn discover(source: &dyn SymbolSource, artifact: &Path) -> Result<Discovery> {
    let Some(version) = source.runtime_abi() else {
        return Ok(Discovery::Skipped(SkipReason::DependencyMissing));
    };
    if version != RUNTIME_ABI_VERSION {
        return Err(incompatible_runtime(artifact, version, RUNTIME_ABI_VERSION));
    }

    let descriptor = source
        .entry_point_descriptor()
        .ok_or_else(|| entry_point_not_found(artifact, ENTRY_POINT_SYMBOL))?
        .map_err(|reason| descriptor_invalid(artifact, reason))?;
    let entry: EntryPoint =
        serde_json::from_str(&descriptor).map_err(|e| descriptor_invalid(artifact, e))?;

    Ok(Discovery::Found(Box::new(entry.config_type)))
}

/// Loads artifacts and locates their configuration type
pub struct Introspector<'a> {
    opener: &'a dyn ArtifactOpener,
    reporter: &'a dyn Reporter,
}

impl<'a> Introspector<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self::with_opener(&NativeLoader, reporter)
    }

    pub fn with_opener(opener: &'a dyn ArtifactOpener, reporter: &'a dyn Reporter) -> Self {
        Self { opener, reporter }
    }

    /// Load `artifact`, apply the convention, and close it again
    pub fn locate_configuration_type(&self, artifact: &Path) -> Result<Discovery> {
        self.reporter
            .debug(&format!("Loading artifact {}", artifact.display()));
        let loaded = self.opener.open(artifact)?;
        let discovery = discover(loaded.as_ref(), artifact);
        drop(loaded);

        if let Ok(Discovery::Found(config_type)) = &discovery {
            self.reporter.info(&format!(
                "Detected configuration type {} in {}",
                config_type.name,
                artifact.display()
            ));
        }
        discovery
    }
}
