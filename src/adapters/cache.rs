use crate::utils::error::{Result, RetrieverError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

/// Directory of stored responses keyed by request URL. Entries never expire.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| RetrieverError::CacheError {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, url: &str) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    /// Unreadable or corrupt entries count as misses.
    pub fn get(&self, url: &str) -> Option<CachedResponse> {
        let path = self.entry_path(url);
        let data = fs::read(&path).ok()?;

        match serde_json::from_slice::<CachedResponse>(&data) {
            Ok(entry) if entry.url == url => Some(entry),
            Ok(_) => {
                tracing::warn!("Cache entry {} belongs to another URL", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn put(&self, entry: &CachedResponse) -> Result<()> {
        let path = self.entry_path(&entry.url);
        let data = serde_json::to_vec_pretty(entry)?;
        fs::write(&path, data).map_err(|e| RetrieverError::CacheError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!("Cached {} at {}", entry.url, path.display());
        Ok(())
    }
}
