//! Credential seam for the Drive client.
//!
//! Token acquisition and refresh happen outside this crate; the client only
//! asks the provider for a currently-valid access token before each call.

use crate::errors::RemoteError;
use async_trait::async_trait;

/// Supplies a valid OAuth2 access token on demand. Implementations own the
/// refresh logic; an expired token surfaced by the API is reported back to
/// the caller as [`RemoteError::AuthExpired`].
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, RemoteError>;
}

/// A fixed bearer token, for callers that handle refresh entirely on their
/// side and reconstruct the client when the token rotates.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, RemoteError> {
        Ok(self.token.clone())
    }
}
