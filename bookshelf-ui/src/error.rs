//! Error types for bookshelf-ui

use thiserror::Error;

/// Errors surfaced to the user by the lookup controls
///
/// Provider unavailability is not an error here: the service answers a total
/// miss with a stub record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Nothing to look up (manual trigger with every field empty)
    #[error("Provide ISBN or title/author to fetch info")]
    MissingInput,

    /// ISBN present but its check digit is wrong
    #[error("ISBN appears invalid, check digits: {0}")]
    InvalidIsbn(String),

    /// The book-info service rejected the request
    #[error("{0}")]
    Rejected(String),

    /// The book-info service could not be reached or answered garbage
    #[error("Failed to fetch book info: {0}")]
    Transport(String),
}
