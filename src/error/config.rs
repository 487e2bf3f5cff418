//! Configuration errors

use super::SvcdebError;

/// Creates a config not found error
pub fn not_found(path: impl Into<String>) -> SvcdebError {
    SvcdebError::ConfigNotFound { path: path.into() }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SvcdebError {
    SvcdebError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> SvcdebError {
    SvcdebError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a duplicate destination error naming both claimants
pub fn duplicate_destination(
    destination: impl Into<String>,
    first: impl Into<String>,
    second: impl Into<String>,
) -> SvcdebError {
    SvcdebError::DuplicateDestination {
        destination: destination.into(),
        first: first.into(),
        second: second.into(),
    }
}

/// Creates an error for a destination that sits below another file destination
pub fn nested_destination(
    file: impl Into<String>,
    nested: impl Into<String>,
    first: impl Into<String>,
    second: impl Into<String>,
) -> SvcdebError {
    SvcdebError::NestedDestination {
        file: file.into(),
        nested: nested.into(),
        first: first.into(),
        second: second.into(),
    }
}

/// Creates an invalid destination error
pub fn invalid_destination(
    destination: impl Into<String>,
    reason: impl Into<String>,
) -> SvcdebError {
    SvcdebError::InvalidDestination {
        destination: destination.into(),
        reason: reason.into(),
    }
}

/// Creates a missing resource source error
pub fn source_not_found(path: impl Into<String>) -> SvcdebError {
    SvcdebError::SourceNotFound { path: path.into() }
}
