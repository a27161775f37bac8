//! Thin filesystem seam so the snapshot pipeline can be exercised without
//! touching disk in tests.

use std::path::Path;

use crate::errors::{EngineError, Result};

pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// The real filesystem, backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(|e| EngineError::IoError(e.to_string()))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::IoError(e.to_string()))?;
            }
        }
        std::fs::write(path, bytes).map_err(|e| EngineError::IoError(e.to_string()))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| EngineError::IoError(e.to_string()))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// An in-memory filesystem double for unit tests.
    #[derive(Default)]
    pub struct MemoryFilesystem {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Filesystem for MemoryFilesystem {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path.to_string_lossy().as_ref())
        }

        fn remove_file(&self, path: &Path) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .remove(path.to_string_lossy().as_ref())
                .map(|_| ())
                .ok_or_else(|| EngineError::IoError("file not found".into()))
        }

        fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string_lossy().into_owned(), bytes.to_vec());
            Ok(())
        }

        fn read(&self, path: &Path) -> Result<Vec<u8>> {
            self.files
                .lock()
                .unwrap()
                .get(path.to_string_lossy().as_ref())
                .cloned()
                .ok_or_else(|| EngineError::IoError("file not found".into()))
        }
    }
}
