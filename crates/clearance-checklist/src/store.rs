//! The checklist store: three-step path resolution, a process-wide cache
//! with lazy per-region initialization, and an atomic hot-update path
//! (§4.6, §3 "Ownership": "The Checklist Store (C6) owns a cache of parsed
//! checklists with process-wide lifetime and lazy initialization").

use crate::error::ChecklistError;
use crate::model::{Checklist, Region};
use crate::validate;
use camino::Utf8PathBuf;
use clearance_utils::atomic_write::write_bytes_atomic;
use clearance_utils::paths::{CONVENTIONAL_CHECKLISTS_DIR, checklists_dir_relative_to_executable};
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Resolve the directory checklists live in, using the three-step search
/// from §4.6: (1) an explicit override, (2) the conventional container
/// path, (3) a path relative to the executable. The first existing
/// directory wins.
fn resolve_checklists_dir(explicit: Option<Utf8PathBuf>) -> Utf8PathBuf {
    if let Some(path) = explicit
        && path.as_std_path().is_dir()
    {
        return path;
    }

    let conventional = Utf8PathBuf::from(CONVENTIONAL_CHECKLISTS_DIR);
    if conventional.as_std_path().is_dir() {
        return conventional;
    }

    if let Ok(relative) = checklists_dir_relative_to_executable()
        && relative.as_std_path().is_dir()
    {
        return relative;
    }

    // Nothing existed; fall back to the conventional path so error messages
    // name a stable, predictable location.
    conventional
}

/// Region-specific checklist store with lazy, cached loading and an atomic,
/// cache-evicting hot-update path.
pub struct ChecklistStore {
    checklists_dir: Utf8PathBuf,
    cache: RwLock<HashMap<Region, Arc<Checklist>>>,
}

impl ChecklistStore {
    /// Resolve the checklists directory once (logging the choice) and
    /// construct an empty cache.
    #[must_use]
    pub fn new(explicit_checklists_dir: Option<Utf8PathBuf>) -> Self {
        let checklists_dir = resolve_checklists_dir(explicit_checklists_dir);
        info!(path = %checklists_dir, "resolved checklists directory");
        Self {
            checklists_dir,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn checklist_path(&self, region: Region) -> Utf8PathBuf {
        self.checklists_dir
            .join(format!("{}_checklist.json", region.lowercase()))
    }

    /// Load the checklist for `region`, serving from cache on a hit.
    /// Concurrent loads for an uncached region coalesce: the write lock
    /// taken to populate the cache is re-checked after acquisition so only
    /// one caller actually reads and parses the file.
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError`] if the file is missing, unreadable, fails
    /// to parse, or fails schema validation (§4.6, §3).
    pub async fn load(&self, region: Region) -> Result<Arc<Checklist>, ChecklistError> {
        if let Some(cached) = self.cache.read().await.get(&region) {
            return Ok(cached.clone());
        }

        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.get(&region) {
            return Ok(cached.clone());
        }

        let path = self.checklist_path(region);
        let checklist = Arc::new(self.read_and_validate(region, &path)?);
        cache.insert(region, checklist.clone());
        Ok(checklist)
    }

    fn read_and_validate(&self, region: Region, path: &Utf8PathBuf) -> Result<Checklist, ChecklistError> {
        let content = fs::read_to_string(path.as_std_path()).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ChecklistError::NotFound {
                    region: region.as_str().to_string(),
                    searched: vec![path.to_string()],
                }
            } else {
                ChecklistError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })?;

        let checklist: Checklist = serde_json::from_str(&content).map_err(|source| ChecklistError::Parse {
            path: path.to_string(),
            source,
        })?;

        validate::validate(&checklist, region, path.as_str())?;
        Ok(checklist)
    }

    /// Validate `new_content` against the schema, verify its `region` field
    /// matches `region`, atomically rewrite the checklist file, and evict
    /// the cache entry so the next `load` re-reads the file (§4.6: "This
    /// supports editor-driven hot updates").
    ///
    /// Holding the cache's write lock for the duration of the file write
    /// makes `replace` mutually exclusive with concurrent `load` calls for
    /// any region (§5: "`replace` is mutually exclusive with loads").
    ///
    /// # Errors
    ///
    /// Returns [`ChecklistError`] if `new_content` fails to parse, fails
    /// schema validation, declares a different region, or the file cannot
    /// be written.
    pub async fn replace(&self, region: Region, new_content: &str) -> Result<(), ChecklistError> {
        let path = self.checklist_path(region);

        let checklist: Checklist = serde_json::from_str(new_content).map_err(|source| ChecklistError::Parse {
            path: path.to_string(),
            source,
        })?;
        validate::validate(&checklist, region, path.as_str())?;

        let mut cache = self.cache.write().await;
        write_bytes_atomic(&path, new_content.as_bytes()).map_err(|source| ChecklistError::Write {
            path: path.to_string(),
            source,
        })?;
        cache.remove(&region);

        Ok(())
    }
}
