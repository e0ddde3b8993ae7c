//! File-backed implementation of the key-value store.
//!
//! Each key is stored as one JSON document `<root>/<key>.json`. Writes go to
//! a temporary sibling file which is flushed to disk and then renamed over
//! the target, so a crash mid-write leaves the previous value intact.
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{KeyValueStore, StoreError};

/// Durable key-value store rooted at a directory.
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root).await?;

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(value.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &path).await?;
        debug!(key, path = %path.display(), bytes = value.len(), "Persisted key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        assert!(store.get("ratings-votes").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_value_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileKeyValueStore::new(dir.path())
            .set("ratings-votes", "{\"vintage\":\"good\"}")
            .await
            .unwrap();

        let reopened = FileKeyValueStore::new(dir.path());
        assert_eq!(
            reopened.get("ratings-votes").await.unwrap().as_deref(),
            Some("{\"vintage\":\"good\"}")
        );
        assert!(!dir.path().join("ratings-votes.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileKeyValueStore::new(&nested);
        store.set("k", "v").await.unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        let err = store.set("../escape", "v").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
