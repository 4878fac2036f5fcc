//! Persistent JSON caches for deck bodies and card type lines.
//!
//! Both caches are plain files under one cache directory and outlive a single
//! run. A missing or unparsable entry is always a miss, never an error. Writes
//! go to a temp file first and are renamed into place, so an interrupted write
//! never leaves a truncated entry behind.

use crate::config;
use crate::error::{EdhrecError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Write `value` as pretty JSON to `dest` via a sibling temp file.
fn write_json_atomic<T: Serialize + ?Sized>(dest: &Path, value: &T) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_dest = dest.with_extension("json.tmp");
    let result = (|| -> Result<()> {
        let contents = serde_json::to_string_pretty(value)?;
        fs::write(&tmp_dest, contents)?;
        fs::rename(&tmp_dest, dest)?;
        Ok(())
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_dest);
    }
    result
}

/// File stem for a deck hash. ASCII letters, digits, `-` and `_` pass
/// through; every other byte becomes `%XX`, so no hash can name a path
/// outside the cache directory or a hidden file.
fn file_stem(hash: &str) -> String {
    let mut stem = String::with_capacity(hash.len());
    for b in hash.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            stem.push(b as char);
        } else {
            stem.push_str(&format!("%{:02X}", b));
        }
    }
    stem
}

// ---------------------------------------------------------------------------
// DeckCache
// ---------------------------------------------------------------------------

/// One JSON file per deck hash, each holding the deck's line array.
#[derive(Debug, Clone)]
pub struct DeckCache {
    dir: PathBuf,
}

impl DeckCache {
    /// Open (creating if needed) the deck cache directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, hash: &str) -> Result<PathBuf> {
        if hash.is_empty() {
            return Err(EdhrecError::InvalidArgument(
                "empty deck hash is not usable as a cache key".into(),
            ));
        }
        Ok(self.dir.join(format!("{}.json", file_stem(hash))))
    }

    /// `true` if an entry file exists for `hash`. Does not parse it.
    pub fn contains(&self, hash: &str) -> bool {
        self.path_for(hash).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Cached lines for `hash`, or `None` if unseen or corrupt.
    pub fn get(&self, hash: &str) -> Option<Vec<String>> {
        let path = self.path_for(hash).ok()?;
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(lines) => Some(lines),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "ignoring corrupt deck cache entry");
                None
            }
        }
    }

    /// Store `lines` under `hash`, replacing any previous entry.
    pub fn put(&self, hash: &str, lines: &[String]) -> Result<()> {
        let path = self.path_for(hash)?;
        write_json_atomic(&path, lines)
    }
}

// ---------------------------------------------------------------------------
// CardTypeCache
// ---------------------------------------------------------------------------

/// Card name to type line, persisted as a single JSON object.
///
/// The in-memory index is guarded by a mutex and the whole map is rewritten
/// on every insert while the lock is held.
#[derive(Debug)]
pub struct CardTypeCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl CardTypeCache {
    /// Load the cache file at `path`. A missing or corrupt file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "card type cache is corrupt; starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, card_name: &str) -> Option<String> {
        self.lock().get(card_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record `type_line` for `card_name` and persist the map.
    ///
    /// An existing entry is never replaced; the value actually stored is
    /// returned.
    pub fn put(&self, card_name: &str, type_line: &str) -> Result<String> {
        let mut entries = self.lock();
        let stored = entries
            .entry(card_name.to_string())
            .or_insert_with(|| type_line.to_string())
            .clone();
        write_json_atomic(&self.path, &*entries)?;
        Ok(stored)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Default locations of both caches under `cache_dir`.
pub fn cache_paths(cache_dir: &Path) -> (PathBuf, PathBuf) {
    (
        cache_dir.join(config::DECK_CACHE_SUBDIR),
        cache_dir.join(config::CARD_TYPE_CACHE_FILE),
    )
}
