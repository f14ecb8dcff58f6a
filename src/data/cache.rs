use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{LoadError, load_file};
use super::model::PredictionTable;

// ---------------------------------------------------------------------------
// File stamp – cache key component
// ---------------------------------------------------------------------------

/// Modification time and length of a file at the moment it was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(path: &Path) -> Result<Self, LoadError> {
        let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
            _ => LoadError::Parse(format!("reading {}: {e}", path.display())),
        })?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// TableCache
// ---------------------------------------------------------------------------

/// Memoizes loaded tables by path.
///
/// An entry is reused only while the file's modification time and length
/// are unchanged.  Failed loads are never stored.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, (FileStamp, Arc<PredictionTable>)>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<PredictionTable>, LoadError> {
        let key = cache_key(path);
        let stamp = match FileStamp::of(path) {
            Ok(stamp) => stamp,
            Err(e) => {
                self.entries.remove(&key);
                return Err(e);
            }
        };

        if let Some((cached_stamp, table)) = self.entries.get(&key) {
            if *cached_stamp == stamp {
                log::debug!("cache hit for {}", key.display());
                return Ok(Arc::clone(table));
            }
            log::info!("{} changed on disk, reloading", key.display());
        }

        let table = Arc::new(load_file(path)?);
        self.entries.insert(key, (stamp, Arc::clone(&table)));
        Ok(table)
    }

    /// Drop the entry for `path`.  Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(&cache_key(path)).is_some()
    }
}

/// Absolute form of `path`; symlinks are not resolved so the key is stable
/// whether or not the file currently exists.
fn cache_key(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
