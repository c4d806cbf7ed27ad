//! The boundary through which committed text reaches storage.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::cache::SummaryCache;
use crate::config::PersistConfig;
use crate::error::PersistError;

pub trait Persist {
    fn persist(&mut self, path: &Path, text: &str) -> Result<(), PersistError>;
}

impl<P: Persist + ?Sized> Persist for Box<P> {
    fn persist(&mut self, path: &Path, text: &str) -> Result<(), PersistError> {
        (**self).persist(path, text)
    }
}

/// Hex SHA-256 of `text`
pub fn content_digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Write-to-temp-then-rename so readers never see a half written file
pub struct AtomicFile {
    path: PathBuf,
    temp_path: PathBuf,
}

impl AtomicFile {
    pub fn new<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Invalid file path"))?;
        let temp_name = format!(".{}.tmp.{}", file_name.to_string_lossy(), std::process::id());
        let temp_path = path.with_file_name(temp_name);

        Ok(Self { path, temp_path })
    }

    pub fn write(&self, content: &[u8]) -> io::Result<()> {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)?;

        temp_file.write_all(content)?;
        temp_file.sync_all()?;

        #[cfg(unix)]
        {
            // Keep the mode of the file being replaced.
            let mode = fs::metadata(&self.path)
                .map(|meta| meta.permissions().mode())
                .unwrap_or(0o644);
            fs::set_permissions(&self.temp_path, fs::Permissions::from_mode(mode))?;
        }

        if let Err(err) = fs::rename(&self.temp_path, &self.path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(err);
        }
        Ok(())
    }
}

/// Writes to the local filesystem, optionally refusing to clobber a file that
/// changed on disk after it was opened for review.
#[derive(Debug, Clone)]
pub struct FilePersister {
    atomic: bool,
    check_conflicts: bool,
    opened: HashMap<PathBuf, String>,
}

impl FilePersister {
    pub fn new(config: &PersistConfig) -> Self {
        Self {
            atomic: config.atomic,
            check_conflicts: config.check_conflicts,
            opened: HashMap::new(),
        }
    }

    /// Remember what `path` held when the review started.
    pub fn track(&mut self, path: &Path, content: &str) {
        self.opened.insert(path.to_path_buf(), content_digest(content));
    }

    fn check_conflict(&self, path: &Path) -> Result<(), PersistError> {
        let Some(expected) = self.opened.get(path) else {
            return Ok(());
        };

        let on_disk = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(PersistError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if &content_digest(&on_disk) != expected {
            return Err(PersistError::Conflict {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

impl Default for FilePersister {
    fn default() -> Self {
        Self::new(&PersistConfig::default())
    }
}

impl Persist for FilePersister {
    fn persist(&mut self, path: &Path, text: &str) -> Result<(), PersistError> {
        if self.check_conflicts {
            self.check_conflict(path)?;
        }

        let written = if self.atomic {
            AtomicFile::new(path).and_then(|file| file.write(text.as_bytes()))
        } else {
            fs::write(path, text)
        };
        written.map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.opened.insert(path.to_path_buf(), content_digest(text));
        info!("Saved {}", path.display());
        Ok(())
    }
}

/// In-memory persister for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryPersister {
    pub writes: Vec<(PathBuf, String)>,
    fail_with: Option<String>,
}

impl MemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }

    /// A persister whose every write is rejected with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            writes: Vec::new(),
            fail_with: Some(reason.into()),
        }
    }

    pub fn last(&self) -> Option<&(PathBuf, String)> {
        self.writes.last()
    }
}

impl Persist for MemoryPersister {
    fn persist(&mut self, path: &Path, text: &str) -> Result<(), PersistError> {
        if let Some(reason) = &self.fail_with {
            return Err(PersistError::Rejected {
                path: path.to_path_buf(),
                reason: reason.clone(),
            });
        }
        self.writes.push((path.to_path_buf(), text.to_string()));
        Ok(())
    }
}

/// Drops a file's cached summary whenever new content is written for it.
pub struct InvalidatingPersister<P, C> {
    inner: P,
    cache: C,
}

impl<P: Persist, C: SummaryCache> InvalidatingPersister<P, C> {
    pub fn new(inner: P, cache: C) -> Self {
        Self { inner, cache }
    }

    pub fn into_parts(self) -> (P, C) {
        (self.inner, self.cache)
    }
}

impl<P: Persist, C: SummaryCache> Persist for InvalidatingPersister<P, C> {
    fn persist(&mut self, path: &Path, text: &str) -> Result<(), PersistError> {
        self.inner.persist(path, text)?;
        if let Err(err) = self.cache.invalidate(path) {
            warn!("Failed to invalidate cached summary for {}: {:#}", path.display(), err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("main.rs");
        fs::write(&file_path, "old")?;

        AtomicFile::new(&file_path)?.write(b"new")?;

        assert_eq!(fs::read_to_string(&file_path)?, "new");
        assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_conflict_detection() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("lib.rs");
        fs::write(&file_path, "v1")?;

        let mut persister = FilePersister::default();
        persister.track(&file_path, "v1");
        fs::write(&file_path, "edited elsewhere")?;

        let result = persister.persist(&file_path, "v2");
        assert!(matches!(result, Err(PersistError::Conflict { .. })));
        assert_eq!(fs::read_to_string(&file_path)?, "edited elsewhere");
        Ok(())
    }

    #[test]
    fn test_repeated_saves_do_not_conflict() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("lib.rs");
        fs::write(&file_path, "v1")?;

        let mut persister = FilePersister::default();
        persister.track(&file_path, "v1");
        persister.persist(&file_path, "v2")?;
        persister.persist(&file_path, "v3")?;

        assert_eq!(fs::read_to_string(&file_path)?, "v3");
        Ok(())
    }

    #[test]
    fn test_invalidating_persister() -> anyhow::Result<()> {
        let path = Path::new("src/app.rs");
        let mut cache = MemoryCache::default();
        cache.set(path, "fn app() {}", "Entry point")?;

        let mut persister = InvalidatingPersister::new(MemoryPersister::new(), cache);
        persister.persist(path, "fn app() { run() }")?;

        let (memory, cache) = persister.into_parts();
        assert_eq!(memory.writes.len(), 1);
        assert_eq!(cache.get(path, "fn app() {}"), None);
        Ok(())
    }

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(content_digest("abc"), content_digest("abc"));
        assert_ne!(content_digest("abc"), content_digest("abd"));
        assert_eq!(content_digest("").len(), 64);
    }
}
