//! Bundle assembly errors

use super::SvcdebError;

/// Creates an assembly failed error
pub fn failed(message: impl Into<String>) -> SvcdebError {
    SvcdebError::Assembly {
        message: message.into(),
    }
}
