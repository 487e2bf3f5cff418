//! File mode and ownership of staged files

use std::ffi::CString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::config::FileMode;
use crate::error::{Result, file_write_failed, ownership_failed};

/// Initial lookup buffer; grown on `ERANGE`
const LOOKUP_BUFFER: usize = 1024;
const LOOKUP_BUFFER_LIMIT: usize = 1 << 20;

/// Set permission bits, replacing whatever the umask produced
pub fn apply_mode(path: &Path, mode: FileMode) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode.bits()))
        .map_err(|e| file_write_failed(path, e))
}

/// Change owner and group of `path`, resolving names through the user database
pub fn apply_owner(path: &Path, owner: &str, group: &str) -> Result<()> {
    let uid = resolve_user(owner).map_err(|reason| ownership_failed(path, reason))?;
    let gid = resolve_group(group).map_err(|reason| ownership_failed(path, reason))?;
    std::os::unix::fs::chown(path, Some(uid), Some(gid))
        .map_err(|e| ownership_failed(path, format!("chown {owner}:{group}: {e}")))
}

/// Effective uid of this process
pub fn effective_uid() -> u32 {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() }
}

/// Resolve a user name (or numeric uid) to a uid
pub fn resolve_user(name: &str) -> std::result::Result<u32, String> {
    if let Ok(uid) = name.parse::<u32>() {
        return Ok(uid);
    }
    let c_name = c_name(name)?;
    let mut size = LOOKUP_BUFFER;
    loop {
        let mut buffer = vec![0 as libc::c_char; size];
        // SAFETY: passwd is plain old data; getpwnam_r fills it on success
        let mut entry: libc::passwd = unsafe { std::mem::zeroed() };
        let mut found: *mut libc::passwd = std::ptr::null_mut();
        // SAFETY: every pointer refers to a live local of the advertised size
        let rc = unsafe {
            libc::getpwnam_r(
                c_name.as_ptr(),
                &raw mut entry,
                buffer.as_mut_ptr(),
                buffer.len(),
                &raw mut found,
            )
        };
        match rc {
            0 if found.is_null() => return Err(format!("unknown user '{name}'")),
            0 => return Ok(entry.pw_uid),
            libc::ERANGE if size < LOOKUP_BUFFER_LIMIT => size *= 2,
            errno => {
                return Err(format!(
                    "cannot look up user '{name}': {}",
                    std::io::Error::from_raw_os_error(errno)
                ));
            }
        }
    }
}

/// Resolve a group name (or numeric gid) to a gid
pub fn resolve_group(name: &str) -> std::result::Result<u32, String> {
    if let Ok(gid) = name.parse::<u32>() {
        return Ok(gid);
    }
    let c_name = c_name(name)?;
    let mut size = LOOKUP_BUFFER;
    loop {
        let mut buffer = vec![0 as libc::c_char; size];
        // SAFETY: group is plain old data; getgrnam_r fills it on success
        let mut entry: libc::group = unsafe { std::mem::zeroed() };
        let mut found: *mut libc::group = std::ptr::null_mut();
        // SAFETY: every pointer refers to a live local of the advertised size
        let rc = unsafe {
            libc::getgrnam_r(
                c_name.as_ptr(),
                &raw mut entry,
                buffer.as_mut_ptr(),
                buffer.len(),
                &raw mut found,
            )
        };
        match rc {
            0 if found.is_null() => return Err(format!("unknown group '{name}'")),
            0 => return Ok(entry.gr_gid),
            libc::ERANGE if size < LOOKUP_BUFFER_LIMIT => size *= 2,
            errno => {
                return Err(format!(
                    "cannot look up group '{name}': {}",
                    std::io::Error::from_raw_os_error(errno)
                ));
            }
        }
    }
}

fn c_name(name: &str) -> std::result::Result<CString, String> {
    CString::new(name).map_err(|_| format!("name '{name}' contains a NUL byte"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::os::unix::fs::MetadataExt;
    use tempfile::TempDir;

    #[test]
    fn test_root_resolves_to_zero() {
        assert_eq!(resolve_user("root").unwrap(), 0);
        assert_eq!(resolve_group("root").unwrap(), 0);
    }

    #[test]
    fn test_numeric_ids_pass_through() {
        assert_eq!(resolve_user("1234").unwrap(), 1234);
        assert_eq!(resolve_group("4321").unwrap(), 4321);
    }

    #[test]
    fn test_unknown_names_rejected() {
        let err = resolve_user("svcdeb-no-such-user").unwrap_err();
        assert!(err.contains("svcdeb-no-such-user"));
        assert!(resolve_group("svcdeb-no-such-group").is_err());
        assert!(resolve_user("bad\0name").is_err());
    }

    #[test]
    fn test_apply_mode_overrides_umask() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let path = temp.path().join("script.sh");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        apply_mode(&path, FileMode::new(0o750)).unwrap();
        let mode = fs::metadata(&path).unwrap().mode();
        assert_eq!(mode & FileMode::MASK, 0o750);
    }

    #[test]
    fn test_apply_owner_to_current_identity() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let path = temp.path().join("file");
        fs::write(&path, "x").unwrap();
        let meta = fs::metadata(&path).unwrap();
        apply_owner(&path, &meta.uid().to_string(), &meta.gid().to_string()).unwrap();
    }

    #[test]
    fn test_apply_owner_unknown_user_is_ownership_error() {
        let temp = TempDir::new_in(crate::temp::temp_dir_base()).unwrap();
        let path = temp.path().join("file");
        fs::write(&path, "x").unwrap();
        let err = apply_owner(&path, "svcdeb-no-such-user", "root").unwrap_err();
        assert!(matches!(err, crate::error::SvcdebError::Ownership { .. }));
    }
}
