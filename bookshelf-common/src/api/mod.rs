//! Shared request/response types for the book-info boundary
//!
//! Used by the lookup service (axum handlers) and by the interactive client.
//! Contains ONLY plain serde types; no HTTP framework dependencies.

pub mod types;

pub use types::{BookInfoRequest, BookInfoResponse};
