//! Fingerprinted-asset name recognition.
//!
//! Build pipelines emit files like `css/app-ab12ef34.css` whose name embeds a
//! content token. The alias `css/app.css` is never discovered from disk or a
//! manifest: it only exists as a derivation from the fingerprinted name, and
//! is subject to the same upload and exclusion decisions as any other asset.

use regex::Regex;

/// Recognizes fingerprinted names and derives their aliases.
///
/// Purely a path-string transformation; no filesystem or network access.
pub struct FingerprintResolver {
    alias_re: Regex,
    hash_re: Regex,
}

impl FingerprintResolver {
    pub fn new() -> Self {
        // Directory part is greedy, base name is lazy: a multi-hyphen segment
        // splits at its first hyphen. Name, token and extension are all
        // dot-free, so multi-part extensions never match.
        let alias_re = Regex::new(r"^(?:(?P<dir>.*)/)?(?P<name>[^/.]+?)-(?P<token>[^/.]+)\.(?P<ext>[^/.]+)$")
            .expect("alias pattern is valid");
        let hash_re = Regex::new(r"-[0-9a-fA-F]{32}$").expect("hash pattern is valid");
        Self { alias_re, hash_re }
    }

    /// Derive the non-fingerprinted alias for `path`, if its final segment
    /// matches the fingerprinted shape `name-token.ext`.
    pub fn alias_for(&self, path: &str) -> Option<String> {
        let caps = self.alias_re.captures(path)?;
        let name = caps.name("name")?.as_str();
        let ext = caps.name("ext")?.as_str();
        Some(match caps.name("dir") {
            Some(dir) => format!("{}/{name}.{ext}", dir.as_str()),
            None => format!("{name}.{ext}"),
        })
    }

    /// Whether the final segment, stripped of its extension, ends in a
    /// 32-hex-character fingerprint suffix. Such objects get aggressive
    /// cache metadata: the name changes whenever the content does.
    pub fn has_hash_suffix(&self, path: &str) -> bool {
        let segment = path.rsplit('/').next().unwrap_or(path);
        let stem = segment.rsplit_once('.').map_or(segment, |(stem, _)| stem);
        self.hash_re.is_match(stem)
    }
}

impl Default for FingerprintResolver {
    fn default() -> Self {
        Self::new()
    }
}
