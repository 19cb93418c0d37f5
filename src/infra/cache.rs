//! File-backed response cache.
//!
//! One JSON document per request signature under the configured directory.
//! Writes land in a temp file first and are renamed into place, so a
//! concurrent reader never observes a torn entry. The cache is advisory:
//! callers treat every failure as a miss and carry on uncached.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::fs;
use tracing::debug;

use crate::domain::roster::RosterQuery;

use super::telemetry::{METRIC_CACHE_HIT, METRIC_CACHE_MISS, METRIC_CACHE_WRITE_FAILED};

const KEY_LENGTH: usize = 16;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("boolean payloads cannot be cached")]
    InvalidPayload,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("cache entry could not be encoded: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Deterministic cache key for one widget request signature.
///
/// Identical signatures always produce the same key, across processes and
/// restarts; distinct signatures get distinct digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_query(query: &RosterQuery) -> Self {
        let digest = Sha256::digest(query.signature().as_bytes());
        let mut key = hex::encode(digest);
        key.truncate(KEY_LENGTH);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    stored_at: i64,
    payload: Value,
}

/// Filesystem-backed, time-boxed response cache.
#[derive(Debug)]
pub struct FileCache {
    directory: PathBuf,
    timeout: Duration,
}

impl FileCache {
    /// Open the cache rooted at `directory`, creating it if necessary.
    pub fn open(directory: PathBuf, timeout: Duration) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory, timeout })
    }

    /// Look up a previously stored payload.
    ///
    /// Expired and undecodable entries are removed and reported as a miss.
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        let path = self.entry_path(key);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                counter!(METRIC_CACHE_MISS).increment(1);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(
                    target: "presenza::cache",
                    key = key.as_str(),
                    error = %err,
                    "removing undecodable cache entry"
                );
                let _ = self.delete(key).await;
                counter!(METRIC_CACHE_MISS).increment(1);
                return None;
            }
        };

        let age = OffsetDateTime::now_utc().unix_timestamp() - entry.stored_at;
        if age > self.timeout.as_secs() as i64 {
            let _ = self.delete(key).await;
            counter!(METRIC_CACHE_MISS).increment(1);
            return None;
        }

        counter!(METRIC_CACHE_HIT).increment(1);
        Some(entry.payload)
    }

    /// Store a payload under the given key, replacing any previous entry.
    ///
    /// Boolean payloads are rejected before any filesystem mutation; a stored
    /// `false` would be indistinguishable from "no data" forever.
    pub async fn set(&self, key: &CacheKey, payload: &Value) -> Result<(), CacheError> {
        if payload.is_boolean() {
            return Err(CacheError::InvalidPayload);
        }

        let result = self.store(key, payload).await;
        if result.is_err() {
            counter!(METRIC_CACHE_WRITE_FAILED).increment(1);
        }
        result
    }

    /// Remove the entry for a key. Missing entries are treated as success.
    pub async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::Io(err)),
        }
    }

    async fn store(&self, key: &CacheKey, payload: &Value) -> Result<(), CacheError> {
        let entry = CacheEntry {
            stored_at: OffsetDateTime::now_utc().unix_timestamp(),
            payload: payload.clone(),
        };
        let encoded = serde_json::to_vec(&entry)?;

        let directory = self.directory.clone();
        let path = self.entry_path(key);

        tokio::task::spawn_blocking(move || -> Result<(), CacheError> {
            let mut file = NamedTempFile::new_in(&directory)?;
            file.write_all(&encoded)?;
            file.persist(&path).map_err(|err| CacheError::Io(err.error))?;
            Ok(())
        })
        .await
        .map_err(|err| CacheError::Io(std::io::Error::other(err)))?
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(format!("{}.json", key.as_str()))
    }
}
