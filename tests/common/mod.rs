pub mod mock_drive_client;

use googledrive_fs::{DriveFsConfig, GoogleDriveFs};
use mock_drive_client::MockDriveClient;
use std::sync::Arc;

/// Fresh filesystem over an empty in-memory store, default configuration.
pub fn new_fs() -> (GoogleDriveFs, MockDriveClient) {
    new_fs_with_config(DriveFsConfig::default())
}

pub fn new_fs_with_config(config: DriveFsConfig) -> (GoogleDriveFs, MockDriveClient) {
    let _ = env_logger::builder().is_test(true).try_init();
    let client = MockDriveClient::new();
    let fs = GoogleDriveFs::new(Arc::new(client.clone()), config);
    (fs, client)
}
