//! I/O boundary traits for testability
//!
//! Services read scripts and write rendered markup through these traits,
//! so they can be tested against an in-memory implementation.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

// ============================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================

/// Filesystem backed by a map, for tests.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper to seed a file.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.into());
        }
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let files = self
            .files
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "file map poisoned"))?;
        files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "file map poisoned"))?;
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }
}
