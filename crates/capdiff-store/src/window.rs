//! Capture window directories
//!
//! A window is a flat directory of artifacts named by
//! [`capdiff_core::model::artifact_file_name`]. Diff output directories use
//! the same type: they obey the same "must not exist yet" rule.

use crate::atomic::{atomic_write, is_temp_name};
use crate::errors::{already_exists, io_error, not_a_directory, not_found, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Handle to an existing window directory
#[derive(Debug, Clone)]
pub struct CaptureWindow {
    path: PathBuf,
}

impl CaptureWindow {
    /// Create a new, empty window
    ///
    /// Missing parent directories are created. The window directory itself is
    /// created with a single exclusive `create_dir`, so an existing path is
    /// reported as `AlreadyExists` and is never touched.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error("create_window_parent", parent, e))?;
        }

        match fs::create_dir(&path) {
            Ok(()) => Ok(Self { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(already_exists("create_window", &path))
            }
            Err(e) => Err(io_error("create_window", &path, e)),
        }
    }

    /// Open a window that a previous run created
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => Ok(Self { path }),
            Ok(_) => Err(not_a_directory("open_window", &path)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found("open_window", &path)),
            Err(e) => Err(io_error("open_window", &path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Label shown in reports and logs: the directory's own name
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Path of an entry inside this window
    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Write one artifact, replacing an earlier artifact of the same name
    pub fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let target = self.entry_path(name);
        atomic_write(&target, content)?;
        Ok(target)
    }

    /// Names of the regular files directly inside the window
    ///
    /// Subdirectories and in-flight temp files are ignored. Names that are
    /// not valid UTF-8 are skipped.
    pub fn list_file_names(&self) -> Result<BTreeSet<String>> {
        let entries =
            fs::read_dir(&self.path).map_err(|e| io_error("list_window", &self.path, e))?;

        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_window", &self.path, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| io_error("list_window", &entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !is_temp_name(name) {
                    names.insert(name.to_string());
                }
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pre-change");

        let created = CaptureWindow::create(&path).unwrap();
        assert_eq!(created.label(), "pre-change");

        let opened = CaptureWindow::open(&path).unwrap();
        assert_eq!(opened.path(), path.as_path());
    }

    #[test]
    fn test_create_existing_is_already_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pre-change");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), b"keep").unwrap();

        let err = CaptureWindow::create(&path).unwrap_err();

        assert_eq!(err.code(), "ERR_ALREADY_EXISTS");
        assert_eq!(fs::read(path.join("keep.txt")).unwrap(), b"keep");
    }

    #[test]
    fn test_create_makes_missing_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("captures").join("2024-q3").join("pre");

        CaptureWindow::create(&path).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_open_missing_and_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");
        assert_eq!(
            CaptureWindow::open(&missing).unwrap_err().code(),
            "ERR_NOT_FOUND"
        );

        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert_eq!(
            CaptureWindow::open(&file).unwrap_err().code(),
            "ERR_NOT_A_DIRECTORY"
        );
    }

    #[test]
    fn test_list_skips_directories() {
        let dir = TempDir::new().unwrap();
        let window = CaptureWindow::create(dir.path().join("w")).unwrap();
        window.write("R1_show_clock.txt", b"12:00").unwrap();
        window.write("R2_show_clock.txt", b"12:01").unwrap();
        fs::create_dir(window.entry_path("nested")).unwrap();

        let names: Vec<String> = window.list_file_names().unwrap().into_iter().collect();
        assert_eq!(names, vec!["R1_show_clock.txt", "R2_show_clock.txt"]);
    }
}
