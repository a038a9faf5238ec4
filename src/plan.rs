//! Per-asset upload planning: compression choice plus object metadata.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::compress::{self, Selection, VariantSizes};
use crate::config::SyncConfig;
use crate::contract::{LocalFiles, ObjectMetadata};
use crate::headers::MetadataResolver;

/// Everything resolved about one pending write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    /// Storage key. Differs from the asset path only when a pre-compressed
    /// variant is substituted for its plain counterpart.
    pub key: String,
    /// Local file whose bytes become the payload.
    pub source: PathBuf,
    pub metadata: ObjectMetadata,
    /// Two-decimal percentage saved by substitution, when one happened.
    pub savings: Option<String>,
}

/// Resolve the plan for one inventory entry, or `None` when the write is
/// skipped entirely (a gzip twin whose plain counterpart substitutes it).
///
/// `base_dir` is the directory the prefix-joined inventory paths live under.
pub fn build(
    path: &str,
    base_dir: &Path,
    config: &SyncConfig,
    files: &dyn LocalFiles,
    metadata: &MetadataResolver<'_>,
) -> io::Result<Option<UploadPlan>> {
    let gzip_variant = compress::is_gzip_variant(path);
    let plain_file = base_dir.join(path);
    let twin_file = base_dir.join(format!("{path}.gz"));

    let sizes = VariantSizes {
        plain: files.size(&plain_file)?,
        gzipped: if gzip_variant {
            None
        } else {
            files
                .exists(&twin_file)
                .then(|| files.size(&twin_file))
                .transpose()?
        },
    };

    let plan = match compress::select(config.gzip, gzip_variant, sizes) {
        Selection::SkipGzipTwin => {
            debug!(path, "Skipping gzip twin; its plain counterpart substitutes it");
            None
        }
        Selection::GzipUnderPlainKey => {
            let savings = sizes
                .gzipped
                .map(|gzipped| compress::savings_percent(sizes.plain, gzipped));
            if let Some(savings) = &savings {
                info!(path, savings = %savings, "Uploading gzip variant under the plain key");
            }
            Some(UploadPlan {
                key: path.to_string(),
                source: twin_file,
                metadata: metadata.resolve(path, true),
                savings,
            })
        }
        Selection::GzipAddressable => Some(UploadPlan {
            key: path.to_string(),
            source: plain_file,
            metadata: metadata.resolve(path, true),
            savings: None,
        }),
        Selection::Plain => Some(UploadPlan {
            key: path.to_string(),
            source: plain_file,
            metadata: metadata.resolve(path, false),
            savings: None,
        }),
    };

    Ok(plan)
}
