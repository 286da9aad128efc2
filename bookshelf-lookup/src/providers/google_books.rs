//! Google Books Client
//!
//! Queries the Google Books volumes API: `{base}/volumes?q=...&maxResults=1`.
//! The same endpoint serves both capabilities; only the `q` parameter differs
//! (`isbn:{isbn}` versus `intitle:`/`inauthor:` clauses).
//!
//! Google serves image links over plain http; they are rewritten to https.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_common::config::ProvidersConfig;
use bookshelf_common::{NormalizedBookRecord, RecordSource};
use serde_json::Value;
use tracing::{debug, warn};

use super::extract::{cover_from_variants, string_field, string_list, text_value};
use crate::http::build_url;
use crate::types::{IdentifierLookup, JsonFetcher, TextLookup};

/// `imageLinks` members, largest first
const IMAGE_VARIANTS: &[&str] = &[
    "extraLarge",
    "large",
    "medium",
    "small",
    "thumbnail",
    "smallThumbnail",
];

/// Compose a text search query from field-qualified clauses.
///
/// Each present field contributes its own clause; clauses are space-joined
/// (encoded as `+` on the wire). Returns `None` when neither field is present.
pub fn compose_text_query(title: Option<&str>, author: Option<&str>) -> Option<String> {
    let clauses: Vec<String> = [
        title.map(|t| format!("intitle:{}", t)),
        author.map(|a| format!("inauthor:{}", a)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" "))
    }
}

/// Google Books Client
pub struct GoogleBooksClient {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl GoogleBooksClient {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &ProvidersConfig) -> Self {
        Self::with_url(fetcher, &config.google_books_url)
    }

    pub fn with_url(fetcher: Arc<dyn JsonFetcher>, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run a volumes query and normalize the first item
    async fn query(&self, q: &str, source: RecordSource) -> Option<NormalizedBookRecord> {
        let url = match build_url(&self.base_url, "/volumes", &[("q", q), ("maxResults", "1")]) {
            Ok(url) => url,
            Err(e) => {
                warn!(provider = "GoogleBooks", error = %e, "Skipping request");
                return None;
            }
        };

        let data = match self.fetcher.get_json(&url).await {
            Ok(data) => data,
            Err(e) => {
                debug!(provider = "GoogleBooks", url = %url, error = %e, "Request failed");
                return None;
            }
        };

        let Some(item) = data
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
        else {
            debug!(provider = "GoogleBooks", q = %q, "No volumes matched");
            return None;
        };

        let record = record_from_volume(item, source);
        debug!(
            provider = "GoogleBooks",
            q = %q,
            title = ?record.title,
            has_cover = record.cover_url.is_some(),
            "Volumes query complete"
        );
        Some(record)
    }
}

fn record_from_volume(item: &Value, source: RecordSource) -> NormalizedBookRecord {
    let empty = Value::Null;
    let info = item.get("volumeInfo").unwrap_or(&empty);

    NormalizedBookRecord::new(
        source,
        string_field(info, "title"),
        string_list(info.get("authors")),
        cover_from_variants(info.get("imageLinks"), IMAGE_VARIANTS),
        text_value(info.get("description")),
    )
    .with_raw(info.clone())
}

#[async_trait]
impl IdentifierLookup for GoogleBooksClient {
    fn name(&self) -> &'static str {
        "GoogleBooks"
    }

    async fn lookup_isbn(&self, isbn: &str) -> Option<NormalizedBookRecord> {
        self.query(&format!("isbn:{}", isbn), RecordSource::GoogleBooksIsbn)
            .await
    }
}

#[async_trait]
impl TextLookup for GoogleBooksClient {
    fn name(&self) -> &'static str {
        "GoogleBooks"
    }

    async fn lookup_text(
        &self,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Option<NormalizedBookRecord> {
        let q = compose_text_query(title, author)?;
        self.query(&q, RecordSource::GoogleBooksSearch).await
    }
}

// ============================================================================
// Tests
// ============================================================================
