//! # Bookshelf Common Library
//!
//! Shared code for the bookshelf lookup service and its interactive client:
//! - ISBN normalization and structural validation
//! - Normalized book metadata types
//! - Request/response envelope for the book-info boundary
//! - Configuration loading

pub mod api;
pub mod book;
pub mod config;
pub mod error;
pub mod isbn;

pub use book::{LookupQuery, NormalizedBookRecord, RecordSource};
pub use error::{Error, Result};
pub use isbn::Isbn;
