//! Atomic write primitives
//!
//! Uses temp→rename so readers never observe a partially written artifact.

use crate::errors::{io_error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of in-flight temp files; listings skip names that start with it
pub const TEMP_PREFIX: &str = ".capdiff-tmp-";

/// Atomically write bytes to a file, replacing any previous content
///
/// The parent directory must already exist.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(target_path);

    fs::write(&temp_path, content).map_err(|e| io_error("write_temp", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        fs::remove_file(&temp_path).ok();
        return Err(io_error("rename_temp", target_path, e));
    }

    Ok(())
}

/// Whether a directory entry name is an in-flight temp file
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX)
}

// Temp files live next to the target so the rename never crosses devices
fn temp_path_for(target_path: &Path) -> PathBuf {
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!("{}{}", TEMP_PREFIX, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("R1_show_version.txt");

        atomic_write(&target, b"hello").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"hello");
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("R1_show_clock.txt");

        atomic_write(&target, b"first").unwrap();
        atomic_write(&target, b"second").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"second");
    }

    #[test]
    fn test_no_tmp_files_after_write() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("test.txt");

        atomic_write(&target, b"clean").unwrap();

        let tmp_count = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(is_temp_name)
                    .unwrap_or(false)
            })
            .count();

        assert_eq!(tmp_count, 0);
    }

    #[test]
    fn test_missing_parent_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("absent").join("test.txt");

        let err = atomic_write(&target, b"x").unwrap_err();
        assert_eq!(err.code(), "ERR_IO");
    }
}
