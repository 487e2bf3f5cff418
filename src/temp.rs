//! Absolute base directory for test scratch space.
//!
//! `TMPDIR=tmp` would otherwise put test trees under the crate being tested.

use std::env;
use std::path::PathBuf;

/// Absolute directory under which scratch directories are created.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_base_is_absolute() {
        assert!(temp_dir_base().is_absolute());
    }
}
