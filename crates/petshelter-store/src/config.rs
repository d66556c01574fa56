//! Store configuration
//!
//! Where the pet database lives and how the connection is tuned.

use std::path::{Path, PathBuf};

/// Default database file name
pub const DEFAULT_DATABASE_FILE: &str = "pets_shelter.db";

/// Where the pet table is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A SQLite file; missing parent directories are created on open
    File(PathBuf),
    /// A private in-memory database, gone when the store is dropped
    InMemory,
}

/// Configuration for opening a [`crate::PetStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
    /// Use write-ahead logging (file locations only)
    pub wal: bool,
}

impl StoreConfig {
    /// File-backed store at `path` with WAL enabled
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            location: StoreLocation::File(path.as_ref().to_path_buf()),
            wal: true,
        }
    }

    /// Private in-memory store
    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            wal: false,
        }
    }

    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file(DEFAULT_DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_wal_file() {
        let config = StoreConfig::default();
        assert_eq!(
            config.location,
            StoreLocation::File(PathBuf::from(DEFAULT_DATABASE_FILE))
        );
        assert!(config.wal);
    }

    #[test]
    fn test_in_memory_has_no_wal() {
        let config = StoreConfig::in_memory();
        assert_eq!(config.location, StoreLocation::InMemory);
        assert!(!config.wal);
    }
}
