//! Provider adapters
//!
//! Each adapter wraps one external bibliographic source and exposes the
//! uniform "attempt lookup, return normalized record or nothing" contract from
//! [`crate::types`].
//!
//! # Adapters
//! 1. **open_library** - Open Library books API (by ISBN) and search API (by text),
//!    with a follow-up works request for descriptions
//! 2. **google_books** - Google Books volumes API, queried by `isbn:` or by
//!    `intitle:`/`inauthor:` clauses
//!
//! # Failure isolation
//! Network errors, non-success statuses and malformed bodies are logged and
//! turned into `None`. The resolver never sees a provider error.

pub mod extract;
pub mod google_books;
pub mod open_library;

pub use google_books::GoogleBooksClient;
pub use open_library::OpenLibraryClient;

// ============================================================================
// Canned Fetcher for Testing
// ============================================================================
