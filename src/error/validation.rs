//! Configuration validation errors

use super::SvcdebError;
use crate::validation::Violation;

/// Creates a deserialization error at a property path
pub fn deserialization(path: impl Into<String>, reason: impl Into<String>) -> SvcdebError {
    let path = path.into();
    SvcdebError::Deserialization {
        path: if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        },
        reason: reason.into(),
    }
}

/// Creates a validation infrastructure error
pub fn infrastructure_missing(message: impl Into<String>) -> SvcdebError {
    SvcdebError::ValidationInfrastructure {
        message: message.into(),
    }
}

/// Creates the terminal error carrying every collected violation
pub fn validation_failed(violations: Vec<Violation>) -> SvcdebError {
    SvcdebError::ValidationFailed { violations }
}
