//! Content-type, cache and custom-header metadata for uploads.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use tracing::debug;

use crate::config::{HeaderMatch, HeaderRule, Provider, SyncConfig};
use crate::contract::ObjectMetadata;
use crate::fingerprint::FingerprintResolver;

/// Max-age granted to fingerprinted assets: their names change whenever
/// their content does, so caches may hold them for a year.
pub const ONE_YEAR_SECONDS: i64 = 31_557_600;

/// Assigns the metadata stored with each written object.
pub struct MetadataResolver<'a> {
    config: &'a SyncConfig,
    fingerprints: FingerprintResolver,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(config: &'a SyncConfig) -> Self {
        Self {
            config,
            fingerprints: FingerprintResolver::new(),
        }
    }

    /// Full metadata for the object about to be stored under `key`.
    pub fn resolve(&self, key: &str, gzip_encoded: bool) -> ObjectMetadata {
        let fingerprint_headers = if self.fingerprints.has_hash_suffix(key) {
            let expires = Utc::now() + Duration::seconds(ONE_YEAR_SECONDS);
            BTreeMap::from([
                (
                    "Cache-Control".to_string(),
                    format!("public, max-age={ONE_YEAR_SECONDS}"),
                ),
                ("Expires".to_string(), expires.to_rfc2822()),
            ])
        } else {
            BTreeMap::new()
        };

        let headers = resolve_headers(key, fingerprint_headers, &self.config.custom_headers);
        debug!(key, headers = headers.len(), "Resolved object headers");

        ObjectMetadata {
            content_type: content_type(key, gzip_encoded),
            content_encoding: gzip_encoded.then(|| "gzip".to_string()),
            headers,
            reduced_redundancy: self.config.reduced_redundancy
                && self.config.provider == Provider::Aws,
        }
    }
}

/// Content type by extension; an unknown extension is absent, not an error.
///
/// For gzip-encoded payloads the trailing `.gz` is stripped first so the
/// stored type describes the decoded representation.
pub fn content_type(key: &str, gzip_encoded: bool) -> Option<String> {
    let lookup = if gzip_encoded {
        key.strip_suffix(".gz").unwrap_or(key)
    } else {
        key
    };
    mime_guess::from_path(lookup)
        .first()
        .map(|mime| mime.to_string())
}

/// Final header mapping for `path`.
///
/// Precedence: an exact rule replaces the fingerprint-derived headers
/// outright; otherwise every matching pattern rule merges over them in rule
/// order, later rules overwriting earlier keys.
pub fn resolve_headers(
    path: &str,
    fingerprint_headers: BTreeMap<String, String>,
    rules: &[HeaderRule],
) -> BTreeMap<String, String> {
    if let Some(rule) = rules
        .iter()
        .find(|rule| matches!(&rule.matcher, HeaderMatch::Exact(exact) if exact == path))
    {
        return rule.headers.clone();
    }

    let mut headers = fingerprint_headers;
    for rule in rules {
        if let HeaderMatch::Pattern(re) = &rule.matcher {
            if re.is_match(path) {
                for (name, value) in &rule.headers {
                    headers.insert(name.clone(), value.clone());
                }
            }
        }
    }
    headers
}
