//! Integration tests for the Al-Thawqa site.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p althawqa-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - The cart against a real storage file
//! - `forms` - Contact, reservation and login flows end to end
//!
//! Each test gets its own storage file under the system temp directory, so
//! tests run in parallel without sharing state.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use althawqa_storefront::storage::{FileStore, KeyValueStore};

/// A storage file in a fresh directory, removed on drop.
pub struct TempStorage {
    dir: PathBuf,
}

impl TempStorage {
    /// Create a new empty directory under the system temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("althawqa-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp storage dir");
        Self { dir }
    }

    /// Path of the storage file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join("storage.json")
    }

    /// Directory holding the storage file.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A new [`FileStore`] over the storage file.
    ///
    /// Every call opens a separate handle, like a page reload.
    #[must_use]
    pub fn open(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::new(self.path()))
    }
}

impl Default for TempStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempStorage {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
