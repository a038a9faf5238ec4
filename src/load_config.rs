use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::{
    HeaderMatch, HeaderRule, IgnoreRule, Provider, RemoteFilesPolicy, SyncConfig,
};

/// A parsed config file: the core's read-only [`SyncConfig`] plus the paths
/// the setup layer needs to wire concrete collaborators.
#[derive(Debug)]
pub struct LoadedConfig {
    pub sync: SyncConfig,
    /// Directory the prefix-joined asset tree lives under.
    pub source_dir: PathBuf,
    /// Root directory of the directory-backed bucket.
    pub bucket_dir: PathBuf,
    /// Optional asset-manifest path; when absent the source tree is walked.
    pub manifest: Option<PathBuf>,
}

#[derive(Deserialize)]
struct StaticConfig {
    source_dir: PathBuf,
    bucket_dir: PathBuf,
    #[serde(default)]
    manifest: Option<PathBuf>,
    #[serde(default)]
    assets_prefix: String,
    #[serde(default)]
    ignored_files: Vec<serde_yaml::Value>,
    #[serde(default)]
    always_upload: Vec<String>,
    #[serde(default)]
    custom_headers: Vec<HeaderRuleYaml>,
    #[serde(default)]
    invalidate: Vec<String>,
    #[serde(default = "default_policy")]
    existing_remote_files: String,
    #[serde(default)]
    gzip: bool,
    #[serde(default)]
    reduced_redundancy: bool,
    #[serde(default = "default_provider")]
    provider: String,
    #[serde(default)]
    cdn_distribution_id: Option<String>,
}

#[derive(Deserialize)]
struct HeaderRuleYaml {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    pattern: Option<String>,
    headers: BTreeMap<String, String>,
}

fn default_policy() -> String {
    "keep".to_string()
}

fn default_provider() -> String {
    "aws".to_string()
}

/// Loads the static YAML config file and converts it into the runtime
/// configuration. Invalid ignore and header rules are skipped with a
/// warning; unknown policy or provider values are fatal.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LoadedConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let existing_remote_files = match static_conf.existing_remote_files.as_str() {
        "keep" => RemoteFilesPolicy::Keep,
        "ignore" => RemoteFilesPolicy::Ignore,
        "delete" => RemoteFilesPolicy::Delete,
        other => {
            error!(policy = %other, "Unsupported existing_remote_files policy in config");
            anyhow::bail!("Unsupported existing_remote_files policy: {}", other);
        }
    };

    let provider = match static_conf.provider.as_str() {
        "aws" => Provider::Aws,
        "gcs" => Provider::Gcs,
        "azure" => Provider::Azure,
        other => {
            error!(provider = %other, "Unsupported provider in config");
            anyhow::bail!("Unsupported provider: {}", other);
        }
    };

    let ignored_files = static_conf
        .ignored_files
        .iter()
        .filter_map(ignore_rule_from_value)
        .collect();

    let custom_headers = static_conf
        .custom_headers
        .into_iter()
        .filter_map(header_rule_from_yaml)
        .collect();

    let sync = SyncConfig {
        assets_prefix: static_conf.assets_prefix,
        ignored_files,
        always_upload: static_conf.always_upload,
        custom_headers,
        invalidate: static_conf.invalidate,
        existing_remote_files,
        gzip: static_conf.gzip,
        reduced_redundancy: static_conf.reduced_redundancy,
        provider,
        cdn_distribution_id: static_conf.cdn_distribution_id,
    };
    sync.trace_loaded();

    Ok(LoadedConfig {
        sync,
        source_dir: static_conf.source_dir,
        bucket_dir: static_conf.bucket_dir,
        manifest: static_conf.manifest,
    })
}

/// An ignore rule is either a plain string (exact file name) or a mapping
/// with a `pattern` key. Anything else is skipped with a warning, never
/// fatal.
fn ignore_rule_from_value(value: &serde_yaml::Value) -> Option<IgnoreRule> {
    match value {
        serde_yaml::Value::String(name) => Some(IgnoreRule::ExactName(name.clone())),
        serde_yaml::Value::Mapping(mapping) => {
            let pattern = mapping.get("pattern").and_then(serde_yaml::Value::as_str);
            match pattern {
                Some(pattern) => match Regex::new(pattern) {
                    Ok(re) => Some(IgnoreRule::Pattern(re)),
                    Err(e) => {
                        warn!(pattern = %pattern, error = %e, "Skipping unparseable ignore pattern");
                        None
                    }
                },
                None => {
                    warn!(rule = ?mapping, "Skipping ignore rule without a pattern key");
                    None
                }
            }
        }
        other => {
            warn!(rule = ?other, "Skipping ignore rule that is neither a name nor a pattern");
            None
        }
    }
}

fn header_rule_from_yaml(rule: HeaderRuleYaml) -> Option<HeaderRule> {
    let matcher = match (rule.path, rule.pattern) {
        (Some(path), _) => HeaderMatch::Exact(path),
        (None, Some(pattern)) => match Regex::new(&pattern) {
            Ok(re) => HeaderMatch::Pattern(re),
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Skipping unparseable header pattern");
                return None;
            }
        },
        (None, None) => {
            warn!("Skipping header rule with neither path nor pattern");
            return None;
        }
    };
    Some(HeaderRule {
        matcher,
        headers: rule.headers,
    })
}
