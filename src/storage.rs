//! Source object store (GCS or local filesystem)
//!
//! Wraps an [`object_store::ObjectStore`] for shard enumeration and download.
//! Production runs point at a GCS bucket via a `gs://bucket` URL; tests point
//! at a local directory.

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// Source store parsed from a URL
#[derive(Debug, Clone)]
pub struct ShardStore {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Original URL scheme for logging
    scheme: String,
}

impl ShardStore {
    /// Parse a store URL and create the appropriate object store
    ///
    /// Supported formats:
    /// - `gs://bucket` - Google Cloud Storage (credentials from environment)
    /// - `/local/path` or `./path` - Local filesystem
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("gs://") {
            Self::from_gcs(url)
        } else {
            Self::from_local(url)
        }
    }

    /// Parse a GCS URL
    fn from_gcs(url: &str) -> Result<Self> {
        let bucket = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::store_url(url, "expected gs:// scheme"))?
            .trim_end_matches('/');

        if bucket.is_empty() || bucket.contains('/') {
            return Err(Error::store_url(
                url,
                "expected gs://bucket with no trailing path",
            ));
        }

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::store_url(url, format!("failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            scheme: "gs".to_string(),
        })
    }

    /// Parse a local filesystem path
    fn from_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::store_url(path, format!("failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            scheme: "file".to_string(),
        })
    }

    /// Get the scheme (gs, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// List shard paths matching a name prefix and extension
    ///
    /// The prefix is a full name prefix (e.g. `raw/taxi/yellow_`), not a
    /// directory: listing happens under its parent directory and file names
    /// are filtered against the final path segment. Results are sorted by
    /// path so a run processes shards in a stable order.
    pub async fn list_shards(&self, prefix: &str, extension: &str) -> Result<Vec<ObjectPath>> {
        let (dir, name_prefix) = match prefix.rfind('/') {
            Some(idx) => (&prefix[..idx], &prefix[idx + 1..]),
            None => ("", prefix),
        };

        let list_prefix = if dir.is_empty() {
            None
        } else {
            Some(ObjectPath::from(dir))
        };

        let suffix = format!(".{extension}");
        let mut shards: Vec<ObjectPath> = self
            .store
            .list(list_prefix.as_ref())
            .try_collect::<Vec<_>>()
            .await?
            .into_iter()
            .map(|meta| meta.location)
            .filter(|location| {
                location
                    .filename()
                    .is_some_and(|name| name.starts_with(name_prefix) && name.ends_with(&suffix))
            })
            .collect();

        shards.sort();
        Ok(shards)
    }

    /// Download one object's bytes
    pub async fn fetch(&self, path: &ObjectPath) -> Result<Bytes> {
        let result = self.store.get(path).await?;
        Ok(result.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_over(dir: &std::path::Path) -> ShardStore {
        ShardStore::from_url(dir.to_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_list_shards_filters_prefix_and_extension() {
        let temp = tempfile::tempdir().unwrap();
        let raw = temp.path().join("raw/taxi");
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join("yellow_2022-01.parquet"), b"a").unwrap();
        fs::write(raw.join("yellow_2022-02.parquet"), b"b").unwrap();
        fs::write(raw.join("yellow_manifest.json"), b"{}").unwrap();
        fs::write(raw.join("green_2022-01.parquet"), b"c").unwrap();

        let store = store_over(temp.path());
        let shards = store.list_shards("raw/taxi/yellow_", "parquet").await.unwrap();

        let names: Vec<_> = shards.iter().filter_map(|p| p.filename()).collect();
        assert_eq!(
            names,
            vec!["yellow_2022-01.parquet", "yellow_2022-02.parquet"]
        );
    }

    #[tokio::test]
    async fn test_list_shards_empty_match_is_ok() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("raw/taxi")).unwrap();

        let store = store_over(temp.path());
        let shards = store.list_shards("raw/taxi/yellow_", "parquet").await.unwrap();
        assert!(shards.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_returns_object_bytes() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("shard.parquet"), b"payload").unwrap();

        let store = store_over(temp.path());
        let bytes = store.fetch(&ObjectPath::from("shard.parquet")).await.unwrap();
        assert_eq!(bytes.as_ref(), b"payload");
    }

    #[test]
    fn test_gcs_url_rejects_trailing_path() {
        let err = ShardStore::from_url("gs://bucket/raw").unwrap_err();
        assert!(err.to_string().contains("no trailing path"));
    }

    #[test]
    fn test_scheme() {
        let temp = tempfile::tempdir().unwrap();
        let store = store_over(temp.path());
        assert_eq!(store.scheme(), "file");
    }
}
