//! Durable storage for the item collection.
//!
//! The whole collection lives under a single key: one JSON array in one file.
//! Every save rewrites the key wholesale; there is no partial persistence.

use crate::error::Result;
use crate::types::Item;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Name of the durable key, carried over from the original storage format.
pub const STORAGE_KEY: &str = "family_grocery_items_v1";

/// File-backed single-key storage for the item collection.
pub struct ListStorage {
    /// Path of the key file.
    path: PathBuf,
}

impl ListStorage {
    /// Create storage rooted at the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        Ok(Self {
            path: dir.join(format!("{}.json", STORAGE_KEY)),
        })
    }

    /// Load the collection.
    ///
    /// A missing key or malformed data yields an empty collection; neither is
    /// surfaced as an error. Other IO failures propagate.
    pub fn load(&self) -> Result<Vec<Item>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&data) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "discarding malformed item data, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Save the collection, overwriting the prior value.
    ///
    /// Writes a temp file and renames it over the key, so readers never see a
    /// partially written array.
    pub fn save(&self, items: &[Item]) -> Result<()> {
        let data = serde_json::to_vec(items)?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;

        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(items = items.len(), bytes = data.len(), "saved collection");
        Ok(())
    }

    /// Size of the persisted key in bytes, if present.
    pub fn size(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// Path of the key file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
