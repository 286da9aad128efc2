//! Core types and trait definitions for bookshelf-lookup
//!
//! Defines the two provider capability traits the resolver iterates over and
//! the HTTP port the adapters are built on:
//! - [`IdentifierLookup`]: canonical ISBN → record
//! - [`TextLookup`]: title and/or author → record
//! - [`JsonFetcher`]: one outbound GET returning a JSON body
//!
//! Adapters never return errors to the resolver. [`ProviderError`] exists only
//! between an adapter and its fetcher, and is logged then dropped.

use async_trait::async_trait;
use bookshelf_common::NormalizedBookRecord;
use serde_json::Value;
use thiserror::Error;

/// Lookup-by-identifier capability
///
/// # Example
/// ```rust,ignore
/// use bookshelf_lookup::types::IdentifierLookup;
///
/// if let Some(record) = client.lookup_isbn("9780306406157").await {
///     println!("{:?} from {}", record.title, record.source.as_str());
/// }
/// ```
#[async_trait]
pub trait IdentifierLookup: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Look up a canonical ISBN.
    ///
    /// Returns `None` when the provider has no entry, the call fails, or the
    /// response cannot be parsed.
    async fn lookup_isbn(&self, isbn: &str) -> Option<NormalizedBookRecord>;
}

/// Lookup-by-text capability
#[async_trait]
pub trait TextLookup: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Best-effort search on title and/or author, taking only the top hit.
    ///
    /// Same failure discipline as [`IdentifierLookup::lookup_isbn`].
    async fn lookup_text(
        &self,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Option<NormalizedBookRecord>;
}

/// Outbound HTTP port
///
/// One GET per call, no retry. Implementations report transport failures,
/// non-success statuses and undecodable bodies as [`ProviderError`].
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, ProviderError>;
}

/// Failure talking to a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("Provider returned status {0}")]
    Status(u16),

    /// Failed to parse response body
    #[error("Parse error: {0}")]
    Parse(String),

    /// Could not build the request URL
    #[error("Invalid request URL: {0}")]
    Url(String),
}
