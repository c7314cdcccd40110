//! Listing pagination: full materialization over the page-token protocol.

mod common;

use common::{new_fs, new_fs_with_config};
use googledrive_fs::drive_service::drive_client::DriveApi;
use googledrive_fs::drive_service::drive_models::FileMetadata;
use googledrive_fs::{DriveFsConfig, FsError, RemoteError};
use std::collections::HashSet;

#[tokio::test]
async fn test_listing_spans_multiple_pages() {
    let (fs, client) = new_fs();
    fs.makedir("/big", false).await.unwrap();
    let dir_id = fs.getinfo("/big").await.unwrap().id;

    // one more entry than the 100-entry default page
    for i in 0..101 {
        client.insert_raw(&format!("file-{}", i), &dir_id, b"x");
    }

    let names = fs.listdir("/big").await.unwrap();
    assert_eq!(names.len(), 101);
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), 101, "pages must not duplicate entries");
}

#[tokio::test]
async fn test_zero_page_size_still_terminates() {
    let config = DriveFsConfig {
        page_size: 0,
        ..DriveFsConfig::default()
    };
    let (fs, client) = new_fs_with_config(config);
    fs.makedir("/d", false).await.unwrap();
    let dir_id = fs.getinfo("/d").await.unwrap().id;
    for i in 0..3 {
        client.insert_raw(&format!("n{}", i), &dir_id, b"");
    }

    assert_eq!(fs.listdir("/d").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_listing_is_idempotent() {
    let (fs, client) = new_fs();
    fs.makedir("/d", false).await.unwrap();
    let dir_id = fs.getinfo("/d").await.unwrap().id;
    for i in 0..5 {
        client.insert_raw(&format!("n{}", i), &dir_id, b"");
    }

    let first = fs.listdir("/d").await.unwrap();
    let second = fs.listdir("/d").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_listing_preserves_service_order() {
    let (fs, client) = new_fs();
    fs.makedir("/ordered", false).await.unwrap();
    let dir_id = fs.getinfo("/ordered").await.unwrap().id;
    for name in ["zeta", "alpha", "mid"] {
        client.insert_raw(name, &dir_id, b"");
    }

    // order as supplied by the service, not sorted
    assert_eq!(fs.listdir("/ordered").await.unwrap(), ["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_page_failure_aborts_whole_listing() {
    let (fs, client) = new_fs();
    fs.makedir("/partial", false).await.unwrap();
    let dir_id = fs.getinfo("/partial").await.unwrap().id;
    for i in 0..150 {
        client.insert_raw(&format!("f{}", i), &dir_id, b"");
    }

    // the listdir resolution itself needs pages; let those through first
    let resolved = fs.listdir("/partial").await.unwrap();
    assert_eq!(resolved.len(), 150);

    client.fail_listing_after_pages(1);
    // first page (root resolution) succeeds, second fails: no partial result
    let result = fs.listdir("/partial").await;
    assert!(matches!(
        result,
        Err(FsError::Remote(RemoteError::Transport(_)))
    ));
}

#[tokio::test]
async fn test_trashed_children_are_hidden() {
    let (fs, client) = new_fs();
    fs.makedir("/d", false).await.unwrap();
    let dir_id = fs.getinfo("/d").await.unwrap().id;
    let keep = client.insert_raw("keep", &dir_id, b"");
    let gone = client.insert_raw("gone", &dir_id, b"");

    let trash = FileMetadata {
        trashed: Some(true),
        ..Default::default()
    };
    client.patch_file(&gone, &trash, &[], &[]).await.unwrap();

    assert_eq!(fs.listdir("/d").await.unwrap(), ["keep"]);
    assert!(client.object_exists(&keep));
    assert!(!fs.exists("/d/gone").await.unwrap());
}
