//! Free-space preflight checks
//!
//! Queries available space on the volume containing the target directory so
//! a run can be gated before any file is created. Querying has no side
//! effects; a shortfall is a planning signal, not a fault.

use std::io;
use std::path::Path;

use crate::{DirSpeedError, Result, BYTES_PER_MB};

/// Free bytes available to unprivileged writers on the volume containing
/// `dir`.
///
/// Fails with [`DirSpeedError::Filesystem`] when the directory does not
/// exist, is not a directory, or the volume cannot be queried.
pub fn free_space_bytes(dir: &Path) -> Result<u64> {
    if !dir.exists() {
        return Err(DirSpeedError::Filesystem(format!(
            "directory does not exist: {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(DirSpeedError::Filesystem(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    volume_free_bytes(dir).map_err(|e| {
        DirSpeedError::Filesystem(format!(
            "failed to query free space for {}: {}",
            dir.display(),
            e
        ))
    })
}

/// Check whether the volume containing `dir` has at least `required_mb`
/// megabytes free.
///
/// Returns `Ok(false)` (not an error) when space is merely short.
pub fn has_sufficient_space(dir: &Path, required_mb: u64) -> Result<bool> {
    let free = free_space_bytes(dir)?;
    Ok(free / BYTES_PER_MB >= required_mb)
}

#[cfg(unix)]
fn volume_free_bytes(dir: &Path) -> io::Result<u64> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let path = CString::new(dir.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL byte"))?;

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(path.as_ptr(), &mut stat) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    // f_bavail counts blocks available to unprivileged processes, which is
    // what a benchmark writing as a normal user can actually use.
    Ok(stat.f_bavail as u64 * stat.f_frsize as u64)
}

#[cfg(windows)]
fn volume_free_bytes(dir: &Path) -> io::Result<u64> {
    use std::os::windows::ffi::OsStrExt;

    extern "system" {
        fn GetDiskFreeSpaceExW(
            lpDirectoryName: *const u16,
            lpFreeBytesAvailableToCaller: *mut u64,
            lpTotalNumberOfBytes: *mut u64,
            lpTotalNumberOfFreeBytes: *mut u64,
        ) -> i32;
    }

    let wide: Vec<u16> = dir.as_os_str().encode_wide().chain(Some(0)).collect();
    let mut available: u64 = 0;
    let mut total: u64 = 0;
    let mut free: u64 = 0;

    let ok = unsafe { GetDiskFreeSpaceExW(wide.as_ptr(), &mut available, &mut total, &mut free) };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_free_space_reports_nonzero_for_tempdir() {
        let dir = tempdir().unwrap();
        let free = free_space_bytes(dir.path()).unwrap();
        assert!(free > 0);
    }

    #[test]
    fn test_missing_directory_is_filesystem_error() {
        let result = free_space_bytes(&PathBuf::from("/definitely/not/a/real/dir"));
        assert!(matches!(result, Err(DirSpeedError::Filesystem(_))));
    }

    #[test]
    fn test_file_path_is_filesystem_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        let result = free_space_bytes(&file);
        assert!(matches!(result, Err(DirSpeedError::Filesystem(_))));
    }

    #[test]
    fn test_sufficient_space_zero_requirement() {
        let dir = tempdir().unwrap();
        assert!(has_sufficient_space(dir.path(), 0).unwrap());
    }

    #[test]
    fn test_insufficient_space_is_false_not_error() {
        let dir = tempdir().unwrap();
        // No volume has u64::MAX megabytes free.
        assert!(!has_sufficient_space(dir.path(), u64::MAX).unwrap());
    }
}
