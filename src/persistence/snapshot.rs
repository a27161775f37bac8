//! Orchestrates the encrypted snapshot: codec + cipher + filesystem.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::crypto::Cipher;
use crate::errors::Result;
use crate::queue::Store;

use super::codec;
use super::filesystem::{Filesystem, RealFilesystem};

pub struct SnapshotStore {
    path: PathBuf,
    cipher: Cipher,
    fs: Arc<dyn Filesystem>,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>, secret: &str) -> Result<Self> {
        Ok(Self {
            path: path.into(),
            cipher: Cipher::new(secret)?,
            fs: Arc::new(RealFilesystem),
        })
    }

    #[cfg(test)]
    pub fn with_filesystem(path: impl Into<PathBuf>, secret: &str, fs: Arc<dyn Filesystem>) -> Result<Self> {
        Ok(Self {
            path: path.into(),
            cipher: Cipher::new(secret)?,
            fs,
        })
    }

    /// Encode, encrypt, and write the store, deleting any prior file first
    /// so a reader never observes a partially-overwritten blob.
    pub fn save(&self, store: &Store) -> Result<()> {
        let plaintext = codec::encode(store)?;
        let ciphertext = self.cipher.encrypt(&plaintext)?;

        if self.fs.exists(&self.path) {
            self.fs.remove_file(&self.path)?;
        }
        self.fs.write(&self.path, &ciphertext)?;
        info!(path = %self.path.display(), bytes = ciphertext.len(), "snapshot saved");
        Ok(())
    }

    /// Load the store from disk, returning an empty store if no snapshot
    /// exists yet (first boot).
    pub fn load(&self) -> Result<Store> {
        if !self.fs.exists(&self.path) {
            warn!(path = %self.path.display(), "no snapshot on disk, starting empty");
            return Ok(Store::new());
        }

        let ciphertext = self.fs.read(&self.path)?;
        let plaintext = self.cipher.decrypt(&ciphertext)?;
        let store = codec::decode(&plaintext)?;
        info!(path = %self.path.display(), queues = store.queues.len(), "snapshot loaded");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::filesystem::testing::MemoryFilesystem;
    use crate::queue::QueueRecord;

    #[test]
    fn save_then_load_round_trips() {
        let fs: Arc<dyn Filesystem> = Arc::new(MemoryFilesystem::default());
        let snap = SnapshotStore::with_filesystem("/snap.db", "top-secret", fs).unwrap();

        let mut store = Store::new();
        store
            .queues
            .insert("orders".into(), QueueRecord::new("orders", "hash"));

        snap.save(&store).unwrap();
        let loaded = snap.load().unwrap();

        assert_eq!(loaded.queues.len(), 1);
        assert!(loaded.queues.contains_key("orders"));
    }

    #[test]
    fn load_with_no_file_returns_empty_store() {
        let fs: Arc<dyn Filesystem> = Arc::new(MemoryFilesystem::default());
        let snap = SnapshotStore::with_filesystem("/missing.db", "secret", fs).unwrap();

        let loaded = snap.load().unwrap();
        assert!(loaded.queues.is_empty());
    }

    #[test]
    fn wrong_secret_fails_to_decrypt() {
        let fs: Arc<dyn Filesystem> = Arc::new(MemoryFilesystem::default());
        let writer = SnapshotStore::with_filesystem("/snap.db", "secret-a", fs.clone()).unwrap();
        writer.save(&Store::new()).unwrap();

        let reader = SnapshotStore::with_filesystem("/snap.db", "secret-b", fs).unwrap();
        assert!(reader.load().is_err());
    }

    #[test]
    fn overwriting_an_existing_snapshot_deletes_the_old_one_first() {
        let fs: Arc<dyn Filesystem> = Arc::new(MemoryFilesystem::default());
        let snap = SnapshotStore::with_filesystem("/snap.db", "secret", fs).unwrap();

        let mut first = Store::new();
        first
            .queues
            .insert("a".into(), QueueRecord::new("a", "hash"));
        snap.save(&first).unwrap();

        let second = Store::new();
        snap.save(&second).unwrap();

        let loaded = snap.load().unwrap();
        assert!(loaded.queues.is_empty());
    }
}
