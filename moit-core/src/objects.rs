//! Object storage port.
//!
//! Uploads (meeting covers, post images, attachments) go through this trait so
//! the HTTP layer never touches a concrete backend. The shipped implementation
//! writes to a local directory and serves objects back under a public URL
//! prefix; an S3-style backend would slot in behind the same trait.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::error::CoreError;

/// Write/delete access to uploaded objects, keyed by a relative path such as
/// `post-images/<uuid>.png`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store the bytes and return the public URL of the object.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<String, CoreError>;

    /// Remove an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CoreError>;

    /// Map a public URL back to the key it was stored under, when the URL
    /// belongs to this store.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Filesystem-backed store. Objects live under `root` and are served under
/// `public_base` (no trailing slash).
pub struct FsObjectStore {
    root: PathBuf,
    public_base: String,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Result<Self, CoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| CoreError::Object(e.to_string()))?;
        Ok(Self {
            root,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys must stay inside the store root.
    fn checked_path(&self, key: &str) -> Result<PathBuf, CoreError> {
        let rel = Path::new(key);
        let safe = rel.components().all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            return Err(CoreError::Object(format!("invalid object key: {key}")));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, CoreError> {
        let path = self.checked_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Object(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::Object(e.to_string()))?;
        info!(key, "stored object");
        Ok(format!("{}/{}", self.public_base, key))
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        let path = self.checked_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(key, "deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Object(e.to_string())),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(&self.public_base)?;
        let key = rest.trim_start_matches('/');
        if key.is_empty() { None } else { Some(key.to_string()) }
    }
}
