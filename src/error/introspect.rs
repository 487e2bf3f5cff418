//! Artifact introspection errors

use std::path::Path;

use super::SvcdebError;

/// Creates an artifact unreadable error
pub fn artifact_unreadable(path: &Path, reason: impl ToString) -> SvcdebError {
    SvcdebError::ArtifactUnreadable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an incompatible runtime ABI error
pub fn incompatible_runtime(path: &Path, found: u32, expected: u32) -> SvcdebError {
    SvcdebError::IncompatibleRuntime {
        path: path.display().to_string(),
        found,
        expected,
    }
}

/// Creates an entry point not found error
pub fn entry_point_not_found(path: &Path, symbol: impl Into<String>) -> SvcdebError {
    SvcdebError::EntryPointNotFound {
        path: path.display().to_string(),
        symbol: symbol.into(),
    }
}

/// Creates an invalid descriptor error
pub fn descriptor_invalid(path: &Path, reason: impl ToString) -> SvcdebError {
    SvcdebError::DescriptorInvalid {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
