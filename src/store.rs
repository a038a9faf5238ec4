//! Concrete collaborators: a directory-backed bucket, disk file probes and a
//! stand-in CDN client.
//!
//! `DirStore` treats a local directory as the bucket, which keeps the binary
//! and the integration tests exercisable end to end without a network. Real
//! S3/GCS/Azure connections and CDN API calls belong to the setup layer
//! outside this crate.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::contract::{CdnInvalidator, LocalFiles, ObjectMetadata, RemoteStore, StoreError};

/// Subdirectory holding metadata sidecars; excluded from object listings.
const META_DIR: &str = ".meta";

/// A local directory acting as the remote bucket.
///
/// Object bytes live at `<root>/<key>`, their metadata at
/// `<root>/.meta/<key>.json`. A missing root directory is reported as
/// [`StoreError::BucketNotFound`], matching the fail-fast contract for
/// missing buckets.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join(META_DIR).join(format!("{key}.json"))
    }

    fn ensure_root(&self) -> Result<(), StoreError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(StoreError::BucketNotFound(
                self.root.display().to_string(),
            ))
        }
    }

    /// Read back the metadata stored alongside an object.
    pub fn metadata(&self, key: &str) -> io::Result<ObjectMetadata> {
        let raw = std::fs::read_to_string(self.meta_path(key))?;
        serde_json::from_str(&raw)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

fn collect_keys(dir: &Path, root: &Path, keys: &mut BTreeSet<String>) -> io::Result<()> {
    for entry_res in std::fs::read_dir(dir)? {
        let entry = entry_res?;
        let path = entry.path();
        if path.is_dir() {
            if entry.file_name() == META_DIR {
                continue;
            }
            collect_keys(&path, root, keys)?;
        } else if path.is_file() {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let forward: Vec<String> = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect();
            keys.insert(forward.join("/"));
        }
    }
    Ok(())
}

#[async_trait]
impl RemoteStore for DirStore {
    async fn list(&self) -> Result<BTreeSet<String>, StoreError> {
        self.ensure_root()?;
        let mut keys = BTreeSet::new();
        collect_keys(&self.root, &self.root, &mut keys)?;
        debug!(count = keys.len(), root = %self.root.display(), "Listed bucket keys");
        Ok(keys)
    }

    async fn write(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), StoreError> {
        self.ensure_root()?;

        let target = self.root.join(key);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, &body)?;

        let meta_path = self.meta_path(key);
        if let Some(parent) = meta_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_vec_pretty(&metadata)
            .map_err(|err| StoreError::Backend(Box::new(err)))?;
        std::fs::write(&meta_path, serialized)?;

        debug!(key, size = body.len(), "Stored object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.ensure_root()?;
        std::fs::remove_file(self.root.join(key))?;
        let meta_path = self.meta_path(key);
        if meta_path.is_file() {
            std::fs::remove_file(meta_path)?;
        }
        debug!(key, "Deleted object");
        Ok(())
    }
}

/// [`LocalFiles`] over the real filesystem.
pub struct DiskFiles;

impl LocalFiles for DiskFiles {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(std::fs::metadata(path)?.len())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Stand-in CDN client: records the batch in the log and synthesizes an
/// invalidation id. The real CDN API client is wired in by the setup layer.
pub struct NoopInvalidator;

#[async_trait]
impl CdnInvalidator for NoopInvalidator {
    async fn invalidate(
        &self,
        distribution_id: &str,
        paths: Vec<String>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let id = format!("inv-{}", Uuid::new_v4());
        info!(
            distribution = %distribution_id,
            paths = ?paths,
            invalidation = %id,
            "No CDN client configured; recorded invalidation batch locally"
        );
        Ok(id)
    }
}
