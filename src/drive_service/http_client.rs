//! Thin reqwest wrapper for the Drive v3 REST endpoints.
//!
//! Handles base-URL prefixing and status-to-error mapping only. Retry and
//! backoff are the caller's transport concern, not implemented here.

use crate::errors::RemoteError;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// HTTP client for Drive API operations.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Full URL for a metadata endpoint, prepending the API base if needed.
    pub fn api_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", DRIVE_API_BASE, url)
        }
    }

    /// Full URL for a media upload endpoint.
    pub fn upload_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", DRIVE_UPLOAD_BASE, url)
        }
    }

    /// Map a non-success status to the remote error taxonomy.
    fn map_error(status: StatusCode, message: String) -> RemoteError {
        match status {
            StatusCode::UNAUTHORIZED => RemoteError::AuthExpired,
            StatusCode::NOT_FOUND => RemoteError::NotFound(message),
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                RemoteError::Conflict(message)
            }
            _ => RemoteError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Self::map_error(status, message))
    }

    /// GET a JSON resource.
    pub async fn get_json<T>(&self, url: &str, auth_header: &str) -> Result<T, RemoteError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.api_url(url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth_header)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// POST a JSON body, expecting a JSON resource back.
    pub async fn post_json<T, B>(
        &self,
        url: &str,
        body: &B,
        auth_header: &str,
    ) -> Result<T, RemoteError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize,
    {
        let url = self.api_url(url);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth_header)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// PATCH a JSON body, expecting a JSON resource back.
    pub async fn patch_json<T, B>(
        &self,
        url: &str,
        body: &B,
        auth_header: &str,
    ) -> Result<T, RemoteError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize,
    {
        let url = self.api_url(url);
        debug!("PATCH {}", url);

        let response = self
            .client
            .patch(&url)
            .header("Authorization", auth_header)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// DELETE a resource. Drive returns an empty body on success.
    pub async fn delete(&self, url: &str, auth_header: &str) -> Result<(), RemoteError> {
        let url = self.api_url(url);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", auth_header)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// GET raw content bytes, with an optional inclusive byte range.
    pub async fn get_bytes(
        &self,
        url: &str,
        auth_header: &str,
        range: Option<(u64, u64)>,
    ) -> Result<Vec<u8>, RemoteError> {
        let url = self.api_url(url);
        debug!("GET (media) {}", url);

        let mut request = self.client.get(&url).header("Authorization", auth_header);
        if let Some((start, end)) = range {
            request = request.header("Range", format!("bytes={}-{}", start, end));
        }

        let response = request.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// PATCH raw content bytes against an upload endpoint, expecting the
    /// updated file resource back.
    pub async fn upload_media<T>(
        &self,
        url: &str,
        content: &[u8],
        mime_type: &str,
        auth_header: &str,
    ) -> Result<T, RemoteError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.upload_url(url);
        debug!("PATCH (media, {} bytes) {}", content.len(), url);

        let response = self
            .client
            .patch(&url)
            .header("Authorization", auth_header)
            .header("Content-Type", mime_type)
            .body(content.to_vec())
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
