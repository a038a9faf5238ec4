//! Collaborator interfaces the sync core depends on.
//!
//! This module defines the traits for the external systems a sync pass talks
//! to (the local asset inventory, the remote object store, the CDN, and the
//! local filesystem) together with the data types that cross those
//! boundaries.
//!
//! The core never constructs these collaborators; they are injected into
//! [`crate::synchronise::Syncer`] already initialized. Concrete
//! implementations live in [`crate::inventory`] and [`crate::store`]; real
//! network-backed stores belong to the setup layer outside this crate.
//!
//! All traits are annotated for `mockall` so tests can generate deterministic
//! mocks (gated on the `test-export-mocks` feature, like the rest of the
//! crate's test surface).

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Metadata attached to a single object write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// MIME type, when the extension resolved to one.
    pub content_type: Option<String>,
    /// Set to `gzip` when pre-compressed bytes are being stored.
    pub content_encoding: Option<String>,
    /// Response headers stored with the object (Cache-Control, Expires,
    /// custom rules).
    pub headers: BTreeMap<String, String>,
    /// AWS reduced-redundancy storage class.
    pub reduced_redundancy: bool,
}

/// Failure surface of a [`RemoteStore`].
///
/// A missing bucket is distinguishable so callers can fail fast before any
/// transfer rather than treating the remote inventory as empty.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket not found: {0}")]
    BucketNotFound(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure surface of a [`LocalInventory`].
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("malformed manifest {path}: {reason}")]
    Manifest { path: String, reason: String },
}

/// Source of the local asset tree under the configured prefix.
///
/// Backed by either a build manifest or a recursive directory walk; the core
/// is agnostic to which. Paths are forward-slash separated and already joined
/// with the assets prefix.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait LocalInventory: Send + Sync {
    async fn list(&self) -> Result<Vec<String>, InventoryError>;
}

/// Remote object-storage bucket: inventory, writes and deletes.
///
/// Implementors own connection, authentication, timeouts and cancellation;
/// the core serializes or parallelizes calls but never retries them.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// The full set of keys currently in the bucket.
    async fn list(&self) -> Result<BTreeSet<String>, StoreError>;

    /// Store `body` under `key` with the given metadata, replacing any
    /// existing object.
    async fn write(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: ObjectMetadata,
    ) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// CDN-level cache eviction for a batch of paths.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CdnInvalidator: Send + Sync {
    /// Submit one batched invalidation request; returns the invalidation
    /// identifier assigned by the CDN.
    async fn invalidate(
        &self,
        distribution_id: &str,
        paths: Vec<String>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Local filesystem probes used while planning uploads.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait LocalFiles: Send + Sync {
    /// Regular-file check, used to drop directories (and derived aliases
    /// with no on-disk counterpart) from the upload set.
    fn is_file(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;

    fn size(&self, path: &Path) -> io::Result<u64>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}
