//! File system and staging errors

use std::path::Path;

use super::SvcdebError;

/// Creates a file read failed error
pub fn read_failed(path: &Path, reason: impl ToString) -> SvcdebError {
    SvcdebError::FileReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: &Path, reason: impl ToString) -> SvcdebError {
    SvcdebError::FileWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a template render error for an undefined parameter
pub fn template_render(
    source_name: impl Into<String>,
    name: impl Into<String>,
    line: usize,
) -> SvcdebError {
    SvcdebError::TemplateRender {
        source_name: source_name.into(),
        name: name.into(),
        line,
    }
}

/// Creates an ownership error
pub fn ownership_failed(path: &Path, reason: impl Into<String>) -> SvcdebError {
    SvcdebError::Ownership {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> SvcdebError {
    SvcdebError::IoError {
        message: message.into(),
    }
}
