//! Book-info request and response envelope

use serde::{Deserialize, Serialize};

use crate::book::{LookupQuery, NormalizedBookRecord};
use crate::Result;

/// POST /api/book-info request body
///
/// All fields are optional on the wire; at least one must be non-empty for
/// the request to be accepted.
///
/// # Examples
///
/// ```
/// use bookshelf_common::api::BookInfoRequest;
///
/// let request: BookInfoRequest = serde_json::from_str(r#"{"isbn": "0-306-40615-2"}"#).unwrap();
/// let query = request.into_query().unwrap();
/// assert_eq!(query.isbn(), Some("0306406152"));
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookInfoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl BookInfoRequest {
    /// Validate into a [`LookupQuery`]
    pub fn into_query(self) -> Result<LookupQuery> {
        LookupQuery::new(self.isbn, self.title, self.author)
    }
}

/// POST /api/book-info response envelope
///
/// Serialized as `{"success": true, "data": {...}}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookInfoResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NormalizedBookRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BookInfoResponse {
    pub fn ok(record: NormalizedBookRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Unwrap the envelope on the client side
    pub fn into_result(self) -> std::result::Result<NormalizedBookRecord, String> {
        match (self.success, self.data) {
            (true, Some(record)) => Ok(record),
            (true, None) => Err("Response missing data".to_string()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "Failed to fetch book info".to_string())),
        }
    }
}
