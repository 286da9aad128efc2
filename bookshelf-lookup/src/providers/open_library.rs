//! Open Library Client
//!
//! Queries Open Library for book metadata, by ISBN or by title/author search.
//!
//! # API Reference
//! - Books:  `{base}/api/books?bibkeys=ISBN:{isbn}&format=json&jscmd=data`
//! - Search: `{base}/search.json?title=...&author=...&limit=1`
//! - Works:  `{base}/works/{id}.json` (descriptions for search hits)
//! - Covers: `{covers}/b/id/{cover_i}-L.jpg`
//!
//! Open Library exposes descriptions in several shapes: a bare string, a
//! `{"type": "/type/text", "value": ...}` object, or only as `excerpts` /
//! `notes` on the edition. All of them are checked, in a fixed order.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_common::config::ProvidersConfig;
use bookshelf_common::{NormalizedBookRecord, RecordSource};
use serde_json::Value;
use tracing::{debug, warn};

use super::extract::{cover_from_variants, first_text, names, string_field, string_list, text_value};
use crate::http::build_url;
use crate::types::{IdentifierLookup, JsonFetcher, TextLookup};

/// Edition cover variants, largest first
const COVER_VARIANTS: &[&str] = &["large", "medium", "small"];

/// Open Library Client
///
/// Implements both lookup capabilities. Text lookups make a second request to
/// the works endpoint when the search hit carries no description; failure of
/// that request leaves the description unset and does not fail the lookup.
pub struct OpenLibraryClient {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    covers_url: String,
}

impl OpenLibraryClient {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &ProvidersConfig) -> Self {
        Self::with_urls(fetcher, &config.open_library_url, &config.covers_url)
    }

    pub fn with_urls(fetcher: Arc<dyn JsonFetcher>, base_url: &str, covers_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            covers_url: covers_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET a JSON document, logging and swallowing every failure
    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Option<Value> {
        let url = match build_url(&self.base_url, path, params) {
            Ok(url) => url,
            Err(e) => {
                warn!(provider = "OpenLibrary", error = %e, "Skipping request");
                return None;
            }
        };

        match self.fetcher.get_json(&url).await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(provider = "OpenLibrary", url = %url, error = %e, "Request failed");
                None
            }
        }
    }

    /// Build a record from a `jscmd=data` edition entry
    fn record_from_edition(&self, book: &Value) -> NormalizedBookRecord {
        let excerpt = book
            .get("excerpts")
            .and_then(Value::as_array)
            .and_then(|excerpts| excerpts.first())
            .and_then(|first| first.get("text"));

        let description = first_text([excerpt, book.get("description"), book.get("notes")]);

        NormalizedBookRecord::new(
            RecordSource::OpenLibraryIsbn,
            string_field(book, "title"),
            names(book.get("authors")),
            cover_from_variants(book.get("cover"), COVER_VARIANTS),
            description,
        )
        .with_raw(book.clone())
    }

    fn search_cover_url(&self, doc: &Value) -> Option<String> {
        let cover_id = doc.get("cover_i").and_then(Value::as_i64)?;
        (cover_id > 0).then(|| format!("{}/b/id/{}-L.jpg", self.covers_url, cover_id))
    }

    /// Description from the works endpoint, if any
    async fn fetch_work_description(&self, work_key: &str) -> Option<String> {
        let path = if work_key.starts_with('/') {
            format!("{}.json", work_key)
        } else {
            format!("/{}.json", work_key)
        };

        let work = self.fetch(&path, &[]).await?;
        text_value(work.get("description"))
    }
}

#[async_trait]
impl IdentifierLookup for OpenLibraryClient {
    fn name(&self) -> &'static str {
        "OpenLibrary"
    }

    async fn lookup_isbn(&self, isbn: &str) -> Option<NormalizedBookRecord> {
        let bibkey = format!("ISBN:{}", isbn);
        let data = self
            .fetch(
                "/api/books",
                &[("bibkeys", bibkey.as_str()), ("format", "json"), ("jscmd", "data")],
            )
            .await?;

        let Some(book) = data.get(&bibkey).filter(|b| b.is_object()) else {
            debug!(provider = "OpenLibrary", isbn = %isbn, "No edition for ISBN");
            return None;
        };

        let record = self.record_from_edition(book);
        debug!(
            provider = "OpenLibrary",
            isbn = %isbn,
            title = ?record.title,
            has_cover = record.cover_url.is_some(),
            "ISBN lookup complete"
        );
        Some(record)
    }
}

#[async_trait]
impl TextLookup for OpenLibraryClient {
    fn name(&self) -> &'static str {
        "OpenLibrary"
    }

    async fn lookup_text(
        &self,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Option<NormalizedBookRecord> {
        let mut params = Vec::with_capacity(3);
        if let Some(title) = title {
            params.push(("title", title));
        }
        if let Some(author) = author {
            params.push(("author", author));
        }
        if params.is_empty() {
            return None;
        }
        params.push(("limit", "1"));

        let data = self.fetch("/search.json", &params).await?;
        let Some(doc) = data
            .get("docs")
            .and_then(Value::as_array)
            .and_then(|docs| docs.first())
        else {
            debug!(provider = "OpenLibrary", ?title, ?author, "Search returned no docs");
            return None;
        };

        let mut description = text_value(doc.get("description"));
        if description.is_none() {
            if let Some(key) = doc.get("key").and_then(Value::as_str) {
                description = self.fetch_work_description(key).await;
            }
        }

        let mut authors = string_list(doc.get("author_name"));
        if authors.is_empty() {
            authors.extend(author.map(str::to_string));
        }

        let record = NormalizedBookRecord::new(
            RecordSource::OpenLibrarySearch,
            string_field(doc, "title").or_else(|| title.map(str::to_string)),
            authors,
            self.search_cover_url(doc),
            description,
        )
        .with_raw(doc.clone());

        debug!(
            provider = "OpenLibrary",
            title = ?record.title,
            has_cover = record.cover_url.is_some(),
            has_description = record.description.is_some(),
            "Search lookup complete"
        );
        Some(record)
    }
}

// ============================================================================
// Tests
// ============================================================================
