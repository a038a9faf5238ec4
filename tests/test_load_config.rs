use std::fs::write;

use tempfile::NamedTempFile;

use asset_sync::config::{HeaderMatch, IgnoreRule, Provider, RemoteFilesPolicy};
use asset_sync::load_config::load_config;

fn config_file(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Creating temp config file failed");
    write(file.path(), contents).expect("Writing temp config failed");
    file
}

#[test]
fn loads_a_full_config() {
    let file = config_file(
        r#"
source_dir: ./public
bucket_dir: ./bucket
assets_prefix: assets
existing_remote_files: delete
gzip: true
provider: aws
reduced_redundancy: true
cdn_distribution_id: DISTRIBUTION42
ignored_files:
  - ".DS_Store"
  - pattern: "\\.map$"
always_upload:
  - index.html
custom_headers:
  - path: assets/robots.txt
    headers:
      Cache-Control: no-cache
  - pattern: "\\.woff2$"
    headers:
      Cache-Control: "public, max-age=604800"
invalidate:
  - css/app.css
"#,
    );

    let loaded = load_config(file.path()).expect("config should load");
    assert_eq!(loaded.source_dir, std::path::Path::new("./public"));
    assert_eq!(loaded.bucket_dir, std::path::Path::new("./bucket"));
    assert_eq!(loaded.manifest, None);

    let sync = &loaded.sync;
    assert_eq!(sync.assets_prefix, "assets");
    assert_eq!(sync.existing_remote_files, RemoteFilesPolicy::Delete);
    assert!(sync.gzip);
    assert!(sync.reduced_redundancy);
    assert_eq!(sync.provider, Provider::Aws);
    assert_eq!(sync.cdn_distribution_id.as_deref(), Some("DISTRIBUTION42"));
    assert_eq!(sync.always_upload, vec!["index.html".to_string()]);
    assert_eq!(sync.invalidate, vec!["css/app.css".to_string()]);

    assert_eq!(sync.ignored_files.len(), 2);
    assert!(matches!(&sync.ignored_files[0], IgnoreRule::ExactName(name) if name == ".DS_Store"));
    assert!(sync.ignored_files[1].matches("js/app.js.map"));
    assert!(!sync.ignored_files[1].matches("js/app.js"));

    assert_eq!(sync.custom_headers.len(), 2);
    assert!(
        matches!(&sync.custom_headers[0].matcher, HeaderMatch::Exact(path) if path == "assets/robots.txt")
    );
    assert!(matches!(
        &sync.custom_headers[1].matcher,
        HeaderMatch::Pattern(_)
    ));
}

#[test]
fn defaults_are_conservative() {
    let file = config_file("source_dir: ./public\nbucket_dir: ./bucket\n");

    let loaded = load_config(file.path()).expect("config should load");
    let sync = &loaded.sync;
    assert_eq!(sync.assets_prefix, "");
    assert_eq!(sync.existing_remote_files, RemoteFilesPolicy::Keep);
    assert!(!sync.gzip);
    assert!(!sync.reduced_redundancy);
    assert_eq!(sync.provider, Provider::Aws);
    assert!(sync.ignored_files.is_empty());
    assert!(sync.custom_headers.is_empty());
}

#[test]
fn invalid_ignore_rules_are_skipped_not_fatal() {
    let file = config_file(
        r#"
source_dir: ./public
bucket_dir: ./bucket
ignored_files:
  - ".DS_Store"
  - 42
  - { wrong_key: "x" }
  - pattern: "("
  - pattern: "\\.map$"
"#,
    );

    let loaded = load_config(file.path()).expect("bad rules are skipped, not fatal");
    // The exact name and the one valid pattern survive.
    assert_eq!(loaded.sync.ignored_files.len(), 2);
}

#[test]
fn header_rules_without_matcher_are_skipped() {
    let file = config_file(
        r#"
source_dir: ./public
bucket_dir: ./bucket
custom_headers:
  - headers:
      Cache-Control: no-cache
  - path: assets/robots.txt
    headers:
      Cache-Control: no-cache
"#,
    );

    let loaded = load_config(file.path()).expect("config should load");
    assert_eq!(loaded.sync.custom_headers.len(), 1);
}

#[test]
fn unknown_policy_is_fatal() {
    let file = config_file(
        "source_dir: ./public\nbucket_dir: ./bucket\nexisting_remote_files: obliterate\n",
    );
    assert!(load_config(file.path()).is_err());
}

#[test]
fn unknown_provider_is_fatal() {
    let file = config_file("source_dir: ./public\nbucket_dir: ./bucket\nprovider: tape\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_config("/no/such/config.yaml").is_err());
}

#[test]
fn manifest_path_is_passed_through() {
    let file = config_file(
        "source_dir: ./public\nbucket_dir: ./bucket\nmanifest: ./public/assets/manifest.json\n",
    );
    let loaded = load_config(file.path()).expect("config should load");
    assert_eq!(
        loaded.manifest,
        Some(std::path::PathBuf::from("./public/assets/manifest.json"))
    );
}
