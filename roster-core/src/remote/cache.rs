//! Filesystem image cache.

use std::path::PathBuf;

use super::ImageCache;
use crate::error::{Result, RosterError};

/// Caches fetched images as `<dir>/<id>.png`.
///
/// Existing files are left untouched, so repeated runs only write images
/// they have not seen before.
pub struct FsImageCache {
    dir: PathBuf,
}

impl FsImageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{id}.png"))
    }
}

impl ImageCache for FsImageCache {
    fn exists(&self, id: u64) -> bool {
        self.path_for(id).exists()
    }

    fn save(&self, id: u64, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            RosterError::Cache(format!(
                "Failed to create cache dir {}: {e}",
                self.dir.display()
            ))
        })?;
        std::fs::write(self.path_for(id), bytes)
            .map_err(|e| RosterError::Cache(format!("Failed to write cached image {id}: {e}")))
    }
}
