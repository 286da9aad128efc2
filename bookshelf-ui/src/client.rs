//! Book-info request boundary
//!
//! The controller talks to the lookup service through [`BookInfoClient`].
//! [`HttpBookInfoClient`] is the production implementation: a JSON POST to
//! `{base}/api/book-info`, answered by a `{success, data, error}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use bookshelf_common::api::{BookInfoRequest, BookInfoResponse};
use bookshelf_common::NormalizedBookRecord;
use tracing::debug;

use crate::error::LookupError;

/// Path of the resolution endpoint on the lookup service
pub const BOOK_INFO_PATH: &str = "/api/book-info";

/// Request boundary to the lookup service
#[async_trait]
pub trait BookInfoClient: Send + Sync {
    async fn fetch_book_info(
        &self,
        request: &BookInfoRequest,
    ) -> Result<NormalizedBookRecord, LookupError>;
}

/// HTTP client for bookshelf-lookup
pub struct HttpBookInfoClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpBookInfoClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), BOOK_INFO_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Decode a response body into a record or a user-facing error.
///
/// The envelope is authoritative regardless of HTTP status: 400 and 500
/// answers carry their message in `error`.
pub fn decode_envelope(status: u16, body: &[u8]) -> Result<NormalizedBookRecord, LookupError> {
    let envelope: BookInfoResponse = serde_json::from_slice(body).map_err(|e| {
        LookupError::Transport(format!("unreadable response (HTTP {}): {}", status, e))
    })?;
    envelope.into_result().map_err(LookupError::Rejected)
}

#[async_trait]
impl BookInfoClient for HttpBookInfoClient {
    async fn fetch_book_info(
        &self,
        request: &BookInfoRequest,
    ) -> Result<NormalizedBookRecord, LookupError> {
        debug!(endpoint = %self.endpoint, isbn = ?request.isbn, "Requesting book info");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        decode_envelope(status, &body)
    }
}
