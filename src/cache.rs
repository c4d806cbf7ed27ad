//! File summary cache.
//!
//! Entries are keyed by path and only served while the content digest still
//! matches, so a stale summary is never handed out for an edited file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::persist::content_digest;

pub trait SummaryCache {
    /// Cached summary for `path`, if it was computed from exactly `content`.
    fn get(&self, path: &Path, content: &str) -> Option<String>;

    fn set(&mut self, path: &Path, content: &str, summary: &str) -> Result<()>;

    /// Returns whether an entry was removed.
    fn invalidate(&mut self, path: &Path) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub digest: String,
    pub summary: String,
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(content: &str, summary: &str) -> Self {
        Self {
            digest: content_digest(content),
            summary: summary.to_string(),
            cached_at: Utc::now(),
        }
    }

    /// Leading characters of the digest for listings. The cache file is user
    /// editable, so the digest may be short or non-ASCII.
    pub fn short_digest(&self) -> String {
        self.digest.chars().take(12).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheData {
    pub version: String,
    pub entries: BTreeMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            entries: BTreeMap::new(),
        }
    }
}

impl CacheData {
    fn lookup(&self, key: &str, content: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.digest == content_digest(content) {
            Some(entry.summary.clone())
        } else {
            debug!("Cached summary for {} is stale", key);
            None
        }
    }
}

fn cache_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    data: CacheData,
}

impl MemoryCache {
    pub fn len(&self) -> usize {
        self.data.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.entries.is_empty()
    }
}

impl SummaryCache for MemoryCache {
    fn get(&self, path: &Path, content: &str) -> Option<String> {
        self.data.lookup(&cache_key(path), content)
    }

    fn set(&mut self, path: &Path, content: &str, summary: &str) -> Result<()> {
        self.data
            .entries
            .insert(cache_key(path), CacheEntry::new(content, summary));
        Ok(())
    }

    fn invalidate(&mut self, path: &Path) -> Result<bool> {
        Ok(self.data.entries.remove(&cache_key(path)).is_some())
    }
}

/// Cache persisted as `.redline/cache.toml`
#[derive(Debug, Clone)]
pub struct TomlCache {
    root_path: PathBuf,
    cache_path: PathBuf,
    data: CacheData,
}

impl TomlCache {
    pub fn open(project_root: impl AsRef<Path>) -> Result<Self> {
        let root_path = project_root.as_ref().to_path_buf();
        let cache_path = root_path.join(".redline").join("cache.toml");

        let data = if cache_path.exists() {
            let content = fs::read_to_string(&cache_path).context("Failed to read cache file")?;
            toml::from_str(&content).context("Failed to parse cache file")?
        } else {
            CacheData::default()
        };

        Ok(Self {
            root_path,
            cache_path,
            data,
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.data.entries.iter()
    }

    pub fn clear(&mut self) -> Result<usize> {
        let removed = self.data.entries.len();
        self.data.entries.clear();
        self.save()?;
        Ok(removed)
    }

    fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.data).context("Failed to serialize cache")?;

        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent).context("Failed to create cache directory")?;
        }
        fs::write(&self.cache_path, content).context("Failed to write cache file")?;

        Ok(())
    }

    fn key(&self, path: &Path) -> String {
        cache_key(path.strip_prefix(&self.root_path).unwrap_or(path))
    }
}

impl SummaryCache for TomlCache {
    fn get(&self, path: &Path, content: &str) -> Option<String> {
        self.data.lookup(&self.key(path), content)
    }

    fn set(&mut self, path: &Path, content: &str, summary: &str) -> Result<()> {
        let key = self.key(path);
        self.data.entries.insert(key, CacheEntry::new(content, summary));
        self.save()
    }

    fn invalidate(&mut self, path: &Path) -> Result<bool> {
        let removed = self.data.entries.remove(&self.key(path)).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }
}
