//! Choice between a plain asset and its pre-compressed `.gz` variant.
//!
//! Asset pipelines often emit both `app.css` and `app.css.gz`. In gzip mode
//! the smaller representation is stored under the plain key with
//! `Content-Encoding: gzip`; outside gzip mode both representations stay
//! independently addressable. Selection works on sizes, not paths; the
//! filesystem probes happen in [`crate::plan`].

/// On-disk sizes for one logical asset.
#[derive(Debug, Clone, Copy)]
pub struct VariantSizes {
    pub plain: u64,
    /// Size of the `.gz` twin, when one exists next to the plain file.
    pub gzipped: Option<u64>,
}

/// Outcome of compression selection for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Do not upload at all: the asset is a `.gz` twin and gzip mode will
    /// substitute it for its plain counterpart.
    SkipGzipTwin,
    /// Upload the gzip bytes under the plain key, `Content-Encoding: gzip`.
    GzipUnderPlainKey,
    /// Upload the plain bytes under the plain key, no special encoding.
    Plain,
    /// Upload the gzip bytes under their own `.gz` key,
    /// `Content-Encoding: gzip`.
    GzipAddressable,
}

/// Whether `path` names the pre-compressed variant of some asset.
pub fn is_gzip_variant(path: &str) -> bool {
    path.ends_with(".gz")
}

/// Deterministic selection given the compression mode, whether the asset is
/// itself the `.gz` variant, and the observed sizes.
///
/// A gzip twin that is not actually smaller loses: the plain bytes are
/// uploaded uncompressed.
pub fn select(gzip_mode: bool, gzip_variant: bool, sizes: VariantSizes) -> Selection {
    match (gzip_mode, gzip_variant, sizes.gzipped) {
        (true, true, _) => Selection::SkipGzipTwin,
        (true, false, Some(gzipped)) if gzipped < sizes.plain => Selection::GzipUnderPlainKey,
        (false, true, _) => Selection::GzipAddressable,
        _ => Selection::Plain,
    }
}

/// Percentage saved by storing `new_size` instead of `original_size`, two
/// decimal places. Logging only; never decision-affecting.
pub fn savings_percent(original_size: u64, new_size: u64) -> String {
    if original_size == 0 {
        return "0.00".to_string();
    }
    let saved = (original_size as f64 - new_size as f64) / original_size as f64 * 100.0;
    format!("{saved:.2}")
}
