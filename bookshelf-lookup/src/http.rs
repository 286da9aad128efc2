//! reqwest-backed [`JsonFetcher`]

use async_trait::async_trait;
use bookshelf_common::config::ProvidersConfig;
use reqwest::{header, Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::types::{JsonFetcher, ProviderError};

/// Shared HTTP client for all providers
#[derive(Clone)]
pub struct ReqwestFetcher {
    http_client: Client,
}

impl ReqwestFetcher {
    /// Build a client carrying the configured User-Agent and optional timeout
    pub fn new(config: &ProvidersConfig) -> Result<Self, reqwest::Error> {
        let mut headers = header::HeaderMap::new();
        if let Ok(value) = header::HeaderValue::from_str(&config.user_agent) {
            headers.insert(header::USER_AGENT, value);
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        debug!(url = %url, "Provider GET");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

/// Join `base` and `path` and append URL-encoded query parameters.
pub fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<String, ProviderError> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    let url = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, params)
    }
    .map_err(|e| ProviderError::Url(format!("{}: {}", raw, e)))?;
    Ok(url.into())
}
