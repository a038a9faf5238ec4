use std::fs::write;

use tempfile::tempdir;

use asset_sync::contract::{InventoryError, LocalInventory};
use asset_sync::inventory::{DiskInventory, ManifestInventory};

#[tokio::test]
async fn disk_inventory_lists_prefix_joined_sorted_paths() {
    let dir = tempdir().expect("create temp dir");
    std::fs::create_dir_all(dir.path().join("assets/css")).expect("create css dir");
    std::fs::create_dir_all(dir.path().join("assets/js")).expect("create js dir");
    write(dir.path().join("assets/js/app.js"), "var x;").expect("write js");
    write(dir.path().join("assets/css/app.css"), "body{}").expect("write css");
    write(dir.path().join("assets/.DS_Store"), "junk").expect("write hidden file");

    let inventory = DiskInventory::new(dir.path(), "assets");
    let listed = inventory.list().await.expect("listing succeeds");
    assert_eq!(
        listed,
        vec!["assets/css/app.css".to_string(), "assets/js/app.js".to_string()]
    );
}

#[tokio::test]
async fn disk_inventory_of_missing_root_is_empty() {
    let dir = tempdir().expect("create temp dir");
    let inventory = DiskInventory::new(dir.path(), "assets");
    let listed = inventory.list().await.expect("listing succeeds");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn manifest_inventory_lists_fingerprinted_names_only() {
    let dir = tempdir().expect("create temp dir");
    let manifest = dir.path().join("manifest.json");
    write(
        &manifest,
        r#"{"assets": {"css/app.css": "css/app-ab12ef34.css", "js/app.js": "js/app-00ff00ff.js"}}"#,
    )
    .expect("write manifest");

    let inventory = ManifestInventory::new(&manifest, "assets");
    let listed = inventory.list().await.expect("listing succeeds");
    assert_eq!(
        listed,
        vec![
            "assets/css/app-ab12ef34.css".to_string(),
            "assets/js/app-00ff00ff.js".to_string(),
        ]
    );
}

#[tokio::test]
async fn malformed_manifest_is_a_distinct_error() {
    let dir = tempdir().expect("create temp dir");
    let manifest = dir.path().join("manifest.json");
    write(&manifest, "not json at all").expect("write manifest");

    let inventory = ManifestInventory::new(&manifest, "assets");
    let err = inventory.list().await.expect_err("malformed manifest");
    assert!(matches!(err, InventoryError::Manifest { .. }), "{err:?}");
}
