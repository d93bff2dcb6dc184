//! Two-tier cache for raw API responses
//!
//! - L1: in-memory LRU keyed by request key
//! - L2: optional directory of JSON files, one per request key
//!
//! The cache only decides whether a request is repeated; it never alters
//! what a request returns. Disk failures are logged and otherwise ignored.

use lru::LruCache;
use serde_json::Value;
use std::{
    fs,
    io::{Read, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{debug, warn};

/// Default number of responses kept in memory.
pub const DEFAULT_MEMORY_CAPACITY: usize = 256;

/// Default on-disk location: `~/.cache/nhl-team-stats`.
pub fn default_cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("nhl-team-stats")
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}

/// Turn a request key like `https://host/api/v1/teams/7/stats?season=20152016` into a file name.
pub fn file_name_for_key(key: &str) -> String {
    let mut name: String = key
        .trim_start_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    name.push_str(".json");
    name
}

pub struct ResponseCache {
    memory: Mutex<LruCache<String, Value>>,
    disk_dir: Option<PathBuf>,
}

impl ResponseCache {
    /// Memory-only cache holding up to `memory_capacity` responses.
    pub fn new(memory_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(memory_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            memory: Mutex::new(LruCache::new(capacity)),
            disk_dir: None,
        }
    }

    /// Also persist responses under `dir`.
    pub fn with_disk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.disk_dir = Some(dir.into());
        self
    }

    pub fn disk_dir(&self) -> Option<&Path> {
        self.disk_dir.as_deref()
    }

    /// Look up a response (memory first, then disk).
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.lock().get(key) {
            return Some(value.clone());
        }

        let value = self.get_from_disk(key)?;
        debug!(key, "response cache disk hit");
        self.lock().put(key.to_string(), value.clone());
        Some(value)
    }

    /// Store a response in memory and, if configured, on disk.
    pub fn put(&self, key: &str, value: &Value) {
        self.lock().put(key.to_string(), value.clone());

        if let Err(err) = self.put_to_disk(key, value) {
            warn!(key, error = %err, "failed to persist cached response");
        }
    }

    pub fn memory_len(&self) -> usize {
        self.lock().len()
    }

    pub fn clear_memory(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Value>> {
        // poisoning leaves the LRU intact
        self.memory.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn get_from_disk(&self, key: &str) -> Option<Value> {
        let path = self.disk_dir.as_ref()?.join(file_name_for_key(key));
        let content = try_read_to_string(&path)?;
        serde_json::from_str(&content).ok()
    }

    fn put_to_disk(&self, key: &str, value: &Value) -> std::io::Result<()> {
        let Some(dir) = &self.disk_dir else {
            return Ok(());
        };
        let json = serde_json::to_string(value)?;
        write_string(&dir.join(file_name_for_key(key)), &json)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_memory_round_trip() {
        let cache = ResponseCache::new(4);
        assert!(cache.get("/api/v1/teams?season=20152016").is_none());

        cache.put("/api/v1/teams?season=20152016", &json!({"teams": []}));
        assert_eq!(
            cache.get("/api/v1/teams?season=20152016"),
            Some(json!({"teams": []}))
        );
        assert_eq!(cache.memory_len(), 1);
    }

    #[test]
    fn test_memory_eviction() {
        let cache = ResponseCache::new(2);
        cache.put("a", &json!(1));
        cache.put("b", &json!(2));
        cache.put("c", &json!(3));

        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("c"), Some(json!(3)));
        assert_eq!(cache.memory_len(), 2);
    }

    #[test]
    fn test_zero_capacity_still_usable() {
        let cache = ResponseCache::new(0);
        cache.put("a", &json!(1));
        assert_eq!(cache.get("a"), Some(json!(1)));
    }

    #[test]
    fn test_disk_layer_survives_memory_clear() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(4).with_disk_dir(dir.path());
        let key = "/api/v1/teams/7/stats?season=20152016";

        cache.put(key, &json!({"stats": []}));
        cache.clear_memory();
        assert_eq!(cache.memory_len(), 0);

        assert_eq!(cache.get(key), Some(json!({"stats": []})));
        // promoted back into memory
        assert_eq!(cache.memory_len(), 1);
        assert!(dir.path().join(file_name_for_key(key)).exists());
    }

    #[test]
    fn test_file_name_for_key() {
        assert_eq!(
            file_name_for_key("/api/v1/teams?season=20152016"),
            "api_v1_teams_season_20152016.json"
        );
    }

    #[test]
    fn test_default_cache_dir_name() {
        assert!(default_cache_dir().ends_with("nhl-team-stats"));
    }
}
