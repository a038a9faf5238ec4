//! Inventory reconciliation: which paths to upload, which remote keys to
//! delete.
//!
//! Both operations are pure set computations over the two inventories and the
//! configured exclusion rules; fetching the inventories (and failing fast
//! when the bucket is missing) is the orchestrator's job.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::SyncConfig;
use crate::fingerprint::FingerprintResolver;

/// Compute the paths to upload for this pass.
///
/// Starts from `local` minus ignored entries minus everything already present
/// in `remote`, adds the always-upload list (prefix-joined), then expands the
/// result with the alias of every fingerprinted member. Aliases are subject
/// to the same exclusion and remote-presence checks as any other asset. The
/// result is deduplicated and sorted, so output order is reproducible.
pub fn upload_set(local: &[String], remote: &BTreeSet<String>, config: &SyncConfig) -> Vec<String> {
    let fingerprints = FingerprintResolver::new();

    let mut selected: BTreeSet<String> = local
        .iter()
        .filter(|path| !config.is_ignored(path))
        .filter(|path| !remote.contains(*path))
        .cloned()
        .collect();

    for entry in &config.always_upload {
        selected.insert(config.join_prefix(entry));
    }

    let aliases: Vec<String> = selected
        .iter()
        .filter_map(|path| fingerprints.alias_for(path))
        .filter(|alias| !config.is_ignored(alias))
        .filter(|alias| !remote.contains(alias))
        .collect();
    for alias in aliases {
        selected.insert(alias);
    }

    debug!(count = selected.len(), "Computed upload set");
    selected.into_iter().collect()
}

/// Compute the remote keys eligible for deletion: `remote − local − ignored −
/// always-upload`.
///
/// Candidates only ever derive from what currently exists remotely. A key is
/// protected when it is still present locally, matches an ignore rule, or is
/// on the always-upload list, whether or not it is part of any upload plan.
pub fn deletion_set(
    remote: &BTreeSet<String>,
    local: &[String],
    config: &SyncConfig,
) -> BTreeSet<String> {
    let local: BTreeSet<&str> = local.iter().map(String::as_str).collect();
    let always: BTreeSet<String> = config
        .always_upload
        .iter()
        .map(|entry| config.join_prefix(entry))
        .collect();

    let doomed: BTreeSet<String> = remote
        .iter()
        .filter(|key| !local.contains(key.as_str()))
        .filter(|key| !config.is_ignored(key))
        .filter(|key| !always.contains(*key))
        .cloned()
        .collect();

    debug!(count = doomed.len(), "Computed deletion set");
    doomed
}
