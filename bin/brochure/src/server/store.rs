//! Key/value blob stores backing the pages and leads resources.
//!
//! Keys are `/`-separated relative names (`page/about.md`). Every operation
//! touches a single key; concurrent writers to the same key resolve as
//! last-writer-wins and nothing is transactional across keys.
//!
//! Store calls block. Request handlers reach them through
//! [`with_store`](super::state::with_store), which runs them on tokio's
//! blocking pool.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Free-form string metadata stored next to a blob.
pub type Metadata = BTreeMap<String, String>;

/// Blob store errors.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The key is empty, absolute or contains `.`/`..`/empty segments.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Metadata could not be encoded or decoded.
    #[error("metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Result type for blob operations.
pub type Result<T> = std::result::Result<T, BlobError>;

/// A listed blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobEntry {
    /// Full key.
    pub key: String,

    /// Content hash, changes whenever the value does.
    pub etag: String,
}

/// A key/value blob store.
pub trait BlobStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Read a value's metadata.
    fn metadata(&self, key: &str) -> Result<Option<Metadata>>;

    /// Write a value, replacing any existing value and metadata.
    fn set(&self, key: &str, value: &[u8], metadata: Metadata) -> Result<()>;

    /// List entries whose key starts with `prefix`, sorted by key.
    fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>>;

    /// Delete a value. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Check a key and split it into its segments.
fn validate_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('/').collect();
    let valid = !key.is_empty()
        && !key.contains('\\')
        && segments
            .iter()
            .all(|s| !s.is_empty() && *s != "." && *s != "..");

    if valid {
        Ok(segments)
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}

fn etag(value: &[u8]) -> String {
    hex::encode(Sha256::digest(value))
}

/// In-process store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<BTreeMap<String, (Vec<u8>, Metadata)>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.blobs.read().get(key).map(|(value, _)| value.clone()))
    }

    fn metadata(&self, key: &str) -> Result<Option<Metadata>> {
        validate_key(key)?;
        Ok(self.blobs.read().get(key).map(|(_, meta)| meta.clone()))
    }

    fn set(&self, key: &str, value: &[u8], metadata: Metadata) -> Result<()> {
        validate_key(key)?;
        self.blobs
            .write()
            .insert(key.to_string(), (value.to_vec(), metadata));
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>> {
        Ok(self
            .blobs
            .read()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, (value, _))| BlobEntry {
                key: key.clone(),
                etag: etag(value),
            })
            .collect())
    }

    fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.blobs.write().remove(key);
        Ok(())
    }
}

/// File-backed store.
///
/// Values live under `<root>/blobs/<key>.blob`, metadata as JSON under
/// `<root>/meta/<key>.json`. The suffixes keep `a` and `a/b` from clashing
/// as file and directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. Directories are created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blobs_dir(&self) -> PathBuf {
        self.root.join("blobs")
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf> {
        suffixed_path(self.blobs_dir(), key, BLOB_SUFFIX)
    }

    fn meta_path(&self, key: &str) -> Result<PathBuf> {
        suffixed_path(self.root.join("meta"), key, META_SUFFIX)
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.blobs_dir()).ok()?;
        let segments: Option<Vec<&str>> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect();
        let key = segments?.join("/");
        key.strip_suffix(BLOB_SUFFIX).map(str::to_string)
    }
}

const BLOB_SUFFIX: &str = ".blob";
const META_SUFFIX: &str = ".json";

fn suffixed_path(base: PathBuf, key: &str, suffix: &str) -> Result<PathBuf> {
    let segments = validate_key(key)?;
    let mut path = segments
        .iter()
        .fold(base, |path, segment| path.join(segment))
        .into_os_string();
    path.push(suffix);
    Ok(PathBuf::from(path))
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_optional(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn write_creating_parents(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

impl BlobStore for FsBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        read_optional(&self.blob_path(key)?)
    }

    fn metadata(&self, key: &str) -> Result<Option<Metadata>> {
        if self.get(key)?.is_none() {
            return Ok(None);
        }
        match read_optional(&self.meta_path(key)?)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(Some(Metadata::new())),
        }
    }

    fn set(&self, key: &str, value: &[u8], metadata: Metadata) -> Result<()> {
        let blob_path = self.blob_path(key)?;
        let meta_path = self.meta_path(key)?;

        write_creating_parents(&meta_path, &serde_json::to_vec(&metadata)?)?;
        write_creating_parents(&blob_path, value)?;
        tracing::debug!(key, bytes = value.len(), "stored blob");
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<BlobEntry>> {
        let dir = self.blobs_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in walkdir::WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                BlobError::Io(e.into_io_error().unwrap_or_else(|| io::Error::other("walk error")))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(key) = self.key_for(entry.path()) else {
                continue;
            };
            if key.starts_with(prefix) {
                let value = fs::read(entry.path())?;
                entries.push(BlobEntry {
                    key,
                    etag: etag(&value),
                });
            }
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn delete(&self, key: &str) -> Result<()> {
        remove_optional(&self.blob_path(key)?)?;
        remove_optional(&self.meta_path(key)?)?;
        tracing::debug!(key, "deleted blob");
        Ok(())
    }
}
