//! Book-info API handler
//!
//! POST /api/book-info with `{isbn?, title?, author?}`.
//!
//! The body is decoded by hand rather than through axum's `Json` extractor
//! so that a malformed body produces the same envelope as every other error.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use bookshelf_common::api::{BookInfoRequest, BookInfoResponse};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/book-info
///
/// 200 with the resolved record (possibly the `none` stub), 400 when no
/// identifier, title or author is present, 500 when the body is not JSON.
pub async fn book_info(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<BookInfoResponse>> {
    let request: BookInfoRequest = if body.iter().all(u8::is_ascii_whitespace) {
        BookInfoRequest::default()
    } else {
        // `null` is treated like an empty object
        serde_json::from_slice::<Option<BookInfoRequest>>(&body)
            .map_err(|e| ApiError::Internal(format!("Malformed request body: {}", e)))?
            .unwrap_or_default()
    };

    let query = request.into_query()?;
    tracing::debug!(
        isbn = ?query.isbn(),
        title = ?query.title(),
        author = ?query.author(),
        "Resolving book info"
    );

    let record = state.resolver.resolve(&query).await;
    Ok(Json(BookInfoResponse::ok(record)))
}

/// Build book-info routes
pub fn book_info_routes() -> Router<AppState> {
    Router::new().route("/api/book-info", post(book_info))
}
