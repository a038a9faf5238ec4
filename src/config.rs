use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, info};

/// How files already present in the remote bucket are treated during a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFilesPolicy {
    /// Leave remote extras alone; the deletion pass is skipped.
    Keep,
    /// Skip the remote inventory fetch entirely; everything local is
    /// uploaded and nothing is deleted.
    Ignore,
    /// Delete remote files no longer justified by the local inventory.
    Delete,
}

/// Storage backend flavour. Only AWS-compatible backends honour the
/// reduced-redundancy storage tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Aws,
    Gcs,
    Azure,
}

/// A single exclusion rule, evaluated against inventory paths.
#[derive(Debug, Clone)]
pub enum IgnoreRule {
    /// Matches the final path segment exactly.
    ExactName(String),
    /// Matches against the full path.
    Pattern(Regex),
}

impl IgnoreRule {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            IgnoreRule::ExactName(name) => {
                path.rsplit('/').next().is_some_and(|segment| segment == name)
            }
            IgnoreRule::Pattern(re) => re.is_match(path),
        }
    }
}

/// A custom-header rule. Exact-path rules take priority over pattern rules;
/// pattern rules only apply when no exact rule matched.
#[derive(Debug, Clone)]
pub struct HeaderRule {
    pub matcher: HeaderMatch,
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub enum HeaderMatch {
    Exact(String),
    Pattern(Regex),
}

/// Resolved, read-only configuration for one sync invocation.
///
/// Loading and validation live in [`crate::load_config`]; the core only ever
/// consumes this struct.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Path prefix joining the local and remote namespaces (e.g. "assets").
    pub assets_prefix: String,
    pub ignored_files: Vec<IgnoreRule>,
    /// Paths (relative to the prefix) uploaded regardless of remote presence.
    pub always_upload: Vec<String>,
    pub custom_headers: Vec<HeaderRule>,
    /// Paths (relative to the prefix) to invalidate at the CDN after a sync.
    pub invalidate: Vec<String>,
    pub existing_remote_files: RemoteFilesPolicy,
    /// When set, pre-compressed `.gz` twins substitute their plain
    /// counterparts instead of being uploaded as separate objects.
    pub gzip: bool,
    pub reduced_redundancy: bool,
    pub provider: Provider,
    pub cdn_distribution_id: Option<String>,
}

impl SyncConfig {
    /// A configuration with conservative defaults: nothing ignored, nothing
    /// forced, remote extras kept, no compression substitution.
    pub fn new(assets_prefix: impl Into<String>) -> Self {
        Self {
            assets_prefix: assets_prefix.into(),
            ignored_files: Vec::new(),
            always_upload: Vec::new(),
            custom_headers: Vec::new(),
            invalidate: Vec::new(),
            existing_remote_files: RemoteFilesPolicy::Keep,
            gzip: false,
            reduced_redundancy: false,
            provider: Provider::Aws,
            cdn_distribution_id: None,
        }
    }

    /// Whether any ignore rule excludes `path`.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored_files.iter().any(|rule| rule.matches(path))
    }

    /// Join a prefix-relative entry into the shared inventory namespace.
    pub fn join_prefix(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        let prefix = self.assets_prefix.trim_matches('/');
        if prefix.is_empty() {
            relative.to_string()
        } else {
            format!("{prefix}/{relative}")
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            assets_prefix = %self.assets_prefix,
            ignored_rules = self.ignored_files.len(),
            always_upload = self.always_upload.len(),
            header_rules = self.custom_headers.len(),
            invalidate = self.invalidate.len(),
            policy = ?self.existing_remote_files,
            gzip = self.gzip,
            "Loaded sync configuration"
        );
        debug!(?self, "Sync configuration (full debug)");
    }
}
