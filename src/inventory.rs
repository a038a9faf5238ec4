//! Local inventory sources.
//!
//! Two interchangeable [`LocalInventory`] implementations: a recursive
//! directory walk and a build-manifest reader. The sync core is agnostic to
//! which one produced the listing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::contract::{InventoryError, LocalInventory};

fn joined(prefix: &str, relative: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{prefix}/{relative}")
    }
}

/// Lists assets by recursively walking `<base_dir>/<prefix>`.
///
/// Hidden entries (leading dot) are skipped. Results are prefix-joined,
/// forward-slash separated and sorted for deterministic output.
pub struct DiskInventory {
    base_dir: PathBuf,
    prefix: String,
}

impl DiskInventory {
    pub fn new(base_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl LocalInventory for DiskInventory {
    async fn list(&self) -> Result<Vec<String>, InventoryError> {
        let prefix = self.prefix.trim_matches('/');
        let root = if prefix.is_empty() {
            self.base_dir.clone()
        } else {
            self.base_dir.join(prefix)
        };

        let mut paths = Vec::new();
        if root.is_dir() {
            visit_dir(&root, &root, &mut paths)?;
        }
        let mut paths: Vec<String> = paths
            .into_iter()
            .map(|relative| joined(prefix, &relative))
            .collect();
        paths.sort();

        info!(count = paths.len(), root = %root.display(), "Listed local assets");
        Ok(paths)
    }
}

fn visit_dir(dir: &Path, root: &Path, results: &mut Vec<String>) -> Result<(), InventoryError> {
    for entry_res in std::fs::read_dir(dir)? {
        let entry = entry_res?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            debug!(path = %path.display(), "Skipping hidden entry");
            continue;
        }
        if path.is_dir() {
            visit_dir(&path, root, results)?;
        } else if path.is_file() {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let forward: Vec<String> = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().into_owned())
                .collect();
            results.push(forward.join("/"));
        }
    }
    Ok(())
}

/// Lists assets from an asset-pipeline manifest file.
///
/// The manifest maps logical names to their fingerprinted file names:
/// `{"assets": {"css/app.css": "css/app-ab12ef34.css"}}`. Only the
/// fingerprinted names are listed; aliases are derived downstream, never
/// enumerated from the manifest.
pub struct ManifestInventory {
    manifest_path: PathBuf,
    prefix: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    assets: BTreeMap<String, String>,
}

impl ManifestInventory {
    pub fn new(manifest_path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl LocalInventory for ManifestInventory {
    async fn list(&self) -> Result<Vec<String>, InventoryError> {
        let raw = std::fs::read_to_string(&self.manifest_path)?;
        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|err| InventoryError::Manifest {
                path: self.manifest_path.display().to_string(),
                reason: err.to_string(),
            })?;

        let mut paths: Vec<String> = manifest
            .assets
            .values()
            .map(|fingerprinted| joined(&self.prefix, fingerprinted))
            .collect();
        paths.sort();
        paths.dedup();

        info!(
            count = paths.len(),
            manifest = %self.manifest_path.display(),
            "Listed assets from manifest"
        );
        Ok(paths)
    }
}
