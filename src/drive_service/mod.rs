//! Remote Drive service: wire models, HTTP plumbing and the typed client.

pub mod auth;
pub mod drive_client;
pub mod drive_models;
pub mod http_client;
