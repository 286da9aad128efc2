//! Normalized book metadata
//!
//! Every provider adapter and the resolver speak [`NormalizedBookRecord`];
//! provider-specific payload shapes never leave the adapter that parsed them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{isbn, Error, Result};

/// Which provider path produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordSource {
    #[serde(rename = "openlibrary:isbn")]
    OpenLibraryIsbn,
    #[serde(rename = "google_books:isbn")]
    GoogleBooksIsbn,
    #[serde(rename = "openlibrary:search")]
    OpenLibrarySearch,
    #[serde(rename = "google_books:search")]
    GoogleBooksSearch,
    /// No provider had anything; the record echoes the caller's input
    #[serde(rename = "none")]
    None,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordSource::OpenLibraryIsbn => "openlibrary:isbn",
            RecordSource::GoogleBooksIsbn => "google_books:isbn",
            RecordSource::OpenLibrarySearch => "openlibrary:search",
            RecordSource::GoogleBooksSearch => "google_books:search",
            RecordSource::None => "none",
        }
    }
}

/// Uniform metadata record returned by every lookup path
///
/// Absent data is `None`, never an empty string. `raw` keeps the provider's
/// original payload for diagnostics and is not interpreted downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedBookRecord {
    pub source: RecordSource,
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl NormalizedBookRecord {
    /// Build a record, normalizing blank values away and forcing a secure cover URL.
    pub fn new(
        source: RecordSource,
        title: Option<String>,
        authors: Vec<String>,
        cover_url: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            source,
            title: non_blank(title),
            authors: authors
                .into_iter()
                .filter_map(|a| non_blank(Some(a)))
                .collect(),
            cover_url: cover_url.and_then(|url| secure_url(&url)),
            description: non_blank(description),
            raw: None,
        }
    }

    /// Attach the provider's original payload.
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Minimal record used when every provider misses.
    ///
    /// Echoes the caller's own title/author back so a form is not emptied.
    pub fn stub(title: Option<&str>, author: Option<&str>) -> Self {
        Self::new(
            RecordSource::None,
            title.map(str::to_string),
            author.map(str::to_string).into_iter().collect(),
            None,
            None,
        )
    }

    /// Carries a cover image or a description.
    pub fn has_enrichment(&self) -> bool {
        self.cover_url.is_some() || self.description.is_some()
    }

    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

/// Trimmed value, or `None` when nothing is left.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Rewrite `http://` to `https://`; drop anything that is not an absolute web URL.
pub fn secure_url(url: &str) -> Option<String> {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("http://") {
        Some(format!("https://{}", rest))
    } else if let Some(rest) = url.strip_prefix("//") {
        // Scheme-relative, as some providers emit
        Some(format!("https://{}", rest))
    } else if url.starts_with("https://") {
        Some(url.to_string())
    } else {
        None
    }
}

/// Input to the resolver
///
/// At least one field is present. `isbn`, when present, is canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    isbn: Option<String>,
    title: Option<String>,
    author: Option<String>,
}

impl LookupQuery {
    /// Build a query from loosely-provided fields.
    ///
    /// Empty strings count as absent and `isbn` is normalized. Fails when
    /// nothing usable remains.
    pub fn new(
        isbn: Option<String>,
        title: Option<String>,
        author: Option<String>,
    ) -> Result<Self> {
        let isbn = isbn
            .map(|raw| isbn::normalize(&raw))
            .filter(|canonical| !canonical.is_empty());
        let title = non_blank(title);
        let author = non_blank(author);

        if isbn.is_none() && title.is_none() && author.is_none() {
            return Err(Error::InvalidInput(
                "Provide isbn or title/author".to_string(),
            ));
        }

        Ok(Self {
            isbn,
            title,
            author,
        })
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn has_text(&self) -> bool {
        self.title.is_some() || self.author.is_some()
    }
}
