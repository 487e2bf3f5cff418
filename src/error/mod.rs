//! Error types and handling for svcdeb
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Package configuration and resource list errors
//! - [`fs`]: File system and staging errors
//! - [`introspect`]: Artifact loading and entry-point discovery errors
//! - [`validation`]: Configuration document validation errors
//! - [`assembly`]: Errors reported by the bundle assembler
//!
//! Every run ends in at most one [`SvcdebError`]. [`SvcdebError::category`] maps each
//! variant onto the packaging error taxonomy so callers can decide how to report it.

pub mod assembly;
pub mod config;
pub mod fs;
pub mod introspect;
pub mod validation;

pub use assembly::failed as assembly_failed;
pub use config::{
    duplicate_destination, invalid as config_invalid, invalid_destination, nested_destination,
    not_found as config_not_found, parse_failed as config_parse_failed, source_not_found,
};
pub use fs::{
    io_error, ownership_failed, read_failed as file_read_failed, template_render,
    write_failed as file_write_failed,
};
pub use introspect::{
    artifact_unreadable, descriptor_invalid, entry_point_not_found, incompatible_runtime,
};
pub use validation::{deserialization, infrastructure_missing, validation_failed};

use miette::Diagnostic;
use thiserror::Error;

use crate::validation::{Violation, render_violations};

/// Broad class of a packaging failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input shape, detected before any file is written
    Configuration,
    /// I/O or template failure while staging
    Extraction,
    /// The artifact could not be inspected
    Introspection,
    /// The rendered configuration was rejected
    Validation,
    /// Failure reported by the bundle assembler
    Assembly,
}

/// Main error type for svcdeb operations
#[derive(Error, Diagnostic, Debug)]
pub enum SvcdebError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(svcdeb::config::not_found),
        help("Pass the package configuration with --config or create svcdeb.yaml")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(svcdeb::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(svcdeb::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Duplicate destination '{destination}' declared by {first} and {second}")]
    #[diagnostic(
        code(svcdeb::config::duplicate_destination),
        help("Every installed file needs its own destination path")
    )]
    DuplicateDestination {
        destination: String,
        first: String,
        second: String,
    },

    #[error("Destination '{nested}' from {second} lies under '{file}' from {first}")]
    #[diagnostic(
        code(svcdeb::config::nested_destination),
        help("A destination cannot be both a file and the directory of another file")
    )]
    NestedDestination {
        file: String,
        nested: String,
        first: String,
        second: String,
    },

    #[error("Invalid destination '{destination}': {reason}")]
    #[diagnostic(
        code(svcdeb::config::invalid_destination),
        help("Destinations are absolute install paths such as /etc/myapp/myapp.yml")
    )]
    InvalidDestination { destination: String, reason: String },

    #[error("Resource source not found: {path}")]
    #[diagnostic(code(svcdeb::config::source_not_found))]
    SourceNotFound { path: String },

    // Extraction errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(svcdeb::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(svcdeb::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to render template {source_name}: undefined parameter '{name}' on line {line}")]
    #[diagnostic(
        code(svcdeb::template::undefined),
        help(
            "Available roots are project, deb, runtime, unix, path, service and svc; add free-form values under `service:`"
        )
    )]
    TemplateRender {
        source_name: String,
        name: String,
        line: usize,
    },

    #[error("Failed to apply ownership to {path}: {reason}")]
    #[diagnostic(code(svcdeb::fs::ownership))]
    Ownership { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(svcdeb::fs::io_error))]
    IoError { message: String },

    // Introspection errors
    #[error("Failed to load artifact {path}: {reason}")]
    #[diagnostic(
        code(svcdeb::introspect::artifact_unreadable),
        help("The artifact must be a shared object built for this platform")
    )]
    ArtifactUnreadable { path: String, reason: String },

    #[error("Artifact {path} was built against runtime ABI {found}, expected {expected}")]
    #[diagnostic(code(svcdeb::introspect::incompatible_runtime))]
    IncompatibleRuntime {
        path: String,
        found: u32,
        expected: u32,
    },

    #[error("Artifact {path} links the runtime but does not export entry point '{symbol}'")]
    #[diagnostic(
        code(svcdeb::introspect::entry_point_not_found),
        help("Declare the service entry point with the runtime's export macro")
    )]
    EntryPointNotFound { path: String, symbol: String },

    #[error("Artifact {path} exported an invalid configuration descriptor: {reason}")]
    #[diagnostic(code(svcdeb::introspect::descriptor_invalid))]
    DescriptorInvalid { path: String, reason: String },

    // Validation errors
    #[error("Failed to deserialize configuration at '{path}': {reason}")]
    #[diagnostic(code(svcdeb::validation::deserialization))]
    Deserialization { path: String, reason: String },

    #[error("Validation infrastructure unavailable: {message}")]
    #[diagnostic(code(svcdeb::validation::infrastructure))]
    ValidationInfrastructure { message: String },

    #[error(
        "Configuration failed validation with {} violation(s):\n{}",
        .violations.len(),
        render_violations(.violations)
    )]
    #[diagnostic(
        code(svcdeb::validation::failed),
        help("Fix every listed property in the configuration template and package again")
    )]
    ValidationFailed { violations: Vec<Violation> },

    // Assembly errors
    #[error("Bundle assembly failed: {message}")]
    #[diagnostic(code(svcdeb::assembly::failed))]
    Assembly { message: String },
}

impl SvcdebError {
    /// Taxonomy bucket for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigInvalid { .. }
            | Self::DuplicateDestination { .. }
            | Self::NestedDestination { .. }
            | Self::InvalidDestination { .. }
            | Self::SourceNotFound { .. } => ErrorCategory::Configuration,
            Self::FileReadFailed { .. }
            | Self::FileWriteFailed { .. }
            | Self::TemplateRender { .. }
            | Self::Ownership { .. }
            | Self::IoError { .. } => ErrorCategory::Extraction,
            Self::ArtifactUnreadable { .. }
            | Self::IncompatibleRuntime { .. }
            | Self::EntryPointNotFound { .. }
            | Self::DescriptorInvalid { .. } => ErrorCategory::Introspection,
            Self::Deserialization { .. }
            | Self::ValidationInfrastructure { .. }
            | Self::ValidationFailed { .. } => ErrorCategory::Validation,
            Self::Assembly { .. } => ErrorCategory::Assembly,
        }
    }
}

impl From<std::io::Error> for SvcdebError {
    fn from(err: std::io::Error) -> Self {
        SvcdebError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SvcdebError {
    fn from(err: serde_yaml::Error) -> Self {
        SvcdebError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SvcdebError {
    fn from(err: serde_json::Error) -> Self {
        SvcdebError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SvcdebError>;

#[cfg(test)]
mod tests;
