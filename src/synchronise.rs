//! Orchestration of one sync pass: upload, delete, invalidate.
//!
//! The pass is strictly sequential: `Uploading`, then `Deleting`, then
//! `Invalidating`. The deletion pass never begins before the upload pass has fully
//! completed, so a remote file is never removed before its locally-required
//! replacement is confirmed written. Any transfer failure aborts the
//! remainder of the invocation; a failed pass is safe to re-run because both
//! sets are re-derived from current remote state.

use std::collections::BTreeSet;
use std::path::PathBuf;

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{RemoteFilesPolicy, SyncConfig};
use crate::contract::{
    CdnInvalidator, InventoryError, LocalFiles, LocalInventory, RemoteStore, StoreError,
};
use crate::headers::MetadataResolver;
use crate::plan::{self, UploadPlan};
use crate::reconcile;

/// Fatal failures of a sync invocation.
///
/// Configuration-level anomalies never reach this type; they are recovered
/// with a warning while loading. A content-type lookup miss is not an error
/// at all.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote bucket does not exist. Raised before any upload is
    /// attempted; an empty remote inventory is only legitimate when the
    /// policy opts out of remote lookup entirely.
    #[error("bucket not found: {0}")]
    BucketNotFound(String),
    #[error("failed to list remote files")]
    RemoteList(#[source] StoreError),
    #[error("failed to list local files")]
    LocalList(#[source] InventoryError),
    #[error("failed to upload {key}")]
    Upload {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("failed to delete {key}")]
    Delete {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("CDN invalidation failed")]
    Invalidation(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to read {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One uploaded object, as recorded in the report.
#[derive(Debug, Clone)]
pub struct UploadedObject {
    pub key: String,
    pub content_encoding: Option<String>,
    /// Percentage saved by gzip substitution, when one happened.
    pub savings: Option<String>,
}

/// What a completed pass did. Zero-length sets are valid outcomes.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub uploaded: Vec<UploadedObject>,
    pub deleted: Vec<String>,
    pub invalidation_id: Option<String>,
}

/// Orchestrates the end-to-end pass over injected collaborators.
///
/// The Syncer holds no connection state of its own; every handle arrives
/// already initialized, so the pass is fully testable with mocks.
pub struct Syncer<'a, L, R, F, C>
where
    L: LocalInventory,
    R: RemoteStore,
    F: LocalFiles,
    C: CdnInvalidator,
{
    config: &'a SyncConfig,
    /// Directory the prefix-joined inventory paths live under.
    base_dir: PathBuf,
    inventory: &'a L,
    store: &'a R,
    files: &'a F,
    cdn: &'a C,
}

impl<'a, L, R, F, C> Syncer<'a, L, R, F, C>
where
    L: LocalInventory,
    R: RemoteStore,
    F: LocalFiles,
    C: CdnInvalidator,
{
    pub fn new(
        config: &'a SyncConfig,
        base_dir: impl Into<PathBuf>,
        inventory: &'a L,
        store: &'a R,
        files: &'a F,
        cdn: &'a C,
    ) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
            inventory,
            store,
            files,
            cdn,
        }
    }

    /// Run one full pass. Fail-fast: the first fatal error aborts the
    /// remaining pipeline and surfaces unchanged to the caller.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        info!("Starting sync pass");
        let mut report = SyncReport::default();

        let remote = self.fetch_remote().await?;
        let local = self.inventory.list().await.map_err(SyncError::LocalList)?;
        let to_upload = reconcile::upload_set(&local, &remote, self.config);
        info!(files = to_upload.len(), "Computed upload set");

        let metadata = MetadataResolver::new(self.config);
        for path in &to_upload {
            let full = self.base_dir.join(path);
            if !self.files.is_file(&full) {
                debug!(path = %path, "Skipping non-regular file");
                continue;
            }
            let built = plan::build(path, &self.base_dir, self.config, self.files, &metadata)
                .map_err(|source| SyncError::Read {
                    path: full.clone(),
                    source,
                })?;
            let Some(upload) = built else {
                continue;
            };
            self.write(&upload, &mut report).await?;
        }

        self.delete_extras(&local, &mut report).await?;
        self.invalidate(&mut report).await?;

        info!(
            uploaded = report.uploaded.len(),
            deleted = report.deleted.len(),
            invalidation = report.invalidation_id.as_deref().unwrap_or("none"),
            "Sync pass complete"
        );
        Ok(report)
    }

    /// Remote inventory, or an empty set when the policy opts out of the
    /// lookup. A missing bucket is fatal before any transfer happens.
    async fn fetch_remote(&self) -> Result<BTreeSet<String>, SyncError> {
        if self.config.existing_remote_files == RemoteFilesPolicy::Ignore {
            debug!("Remote inventory lookup skipped by policy");
            return Ok(BTreeSet::new());
        }
        match self.store.list().await {
            Ok(keys) => {
                debug!(count = keys.len(), "Fetched remote inventory");
                Ok(keys)
            }
            Err(StoreError::BucketNotFound(bucket)) => {
                error!(bucket = %bucket, "Remote bucket does not exist");
                Err(SyncError::BucketNotFound(bucket))
            }
            Err(source) => Err(SyncError::RemoteList(source)),
        }
    }

    async fn write(&self, upload: &UploadPlan, report: &mut SyncReport) -> Result<(), SyncError> {
        let body = self
            .files
            .read(&upload.source)
            .map_err(|source| SyncError::Read {
                path: upload.source.clone(),
                source,
            })?;
        let size = body.len();
        self.store
            .write(&upload.key, body, upload.metadata.clone())
            .await
            .map_err(|source| SyncError::Upload {
                key: upload.key.clone(),
                source,
            })?;
        info!(
            key = %upload.key,
            size,
            encoding = upload.metadata.content_encoding.as_deref().unwrap_or("identity"),
            "Uploaded"
        );
        report.uploaded.push(UploadedObject {
            key: upload.key.clone(),
            content_encoding: upload.metadata.content_encoding.clone(),
            savings: upload.savings.clone(),
        });
        Ok(())
    }

    /// Deletion pass. Skipped unless the policy explicitly asks for it; the
    /// remote inventory is fetched again because remote state may have
    /// mutated since the upload pass. Deletions of distinct keys are
    /// independent, so they are issued concurrently and awaited fail-fast.
    async fn delete_extras(
        &self,
        local: &[String],
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        if self.config.existing_remote_files != RemoteFilesPolicy::Delete {
            debug!(policy = ?self.config.existing_remote_files, "Deletion pass skipped");
            return Ok(());
        }

        let remote = self.fetch_remote().await?;
        let doomed = reconcile::deletion_set(&remote, local, self.config);
        info!(files = doomed.len(), "Deleting remote files with no local counterpart");

        let deletions = doomed.iter().map(|key| async move {
            self.store
                .delete(key)
                .await
                .map_err(|source| SyncError::Delete {
                    key: key.clone(),
                    source,
                })?;
            info!(key = %key, "Deleted remote file");
            Ok::<_, SyncError>(key.clone())
        });
        report.deleted = try_join_all(deletions).await?;
        Ok(())
    }

    /// One batched invalidation request, when a distribution is configured
    /// and the path list is non-empty. Each entry is submitted as
    /// `/<prefix>/<path>`.
    async fn invalidate(&self, report: &mut SyncReport) -> Result<(), SyncError> {
        let Some(distribution) = &self.config.cdn_distribution_id else {
            return Ok(());
        };
        if self.config.invalidate.is_empty() {
            return Ok(());
        }

        let paths: Vec<String> = self
            .config
            .invalidate
            .iter()
            .map(|entry| format!("/{}", self.config.join_prefix(entry)))
            .collect();
        info!(distribution = %distribution, paths = paths.len(), "Submitting CDN invalidation");
        let id = self
            .cdn
            .invalidate(distribution, paths)
            .await
            .map_err(SyncError::Invalidation)?;
        info!(invalidation = %id, "CDN invalidation submitted");
        report.invalidation_id = Some(id);
        Ok(())
    }
}
