//! Add-book form state
//!
//! Field values are kept as the user typed them (empty string = empty field).
//! Conversion to typed records happens at the edges: [`BookForm::lookup_request`]
//! for metadata resolution and [`BookForm::to_draft`] for submission.

use std::fmt;
use std::str::FromStr;

use bookshelf_common::api::BookInfoRequest;
use bookshelf_common::book::non_blank;
use bookshelf_common::{Error, Isbn, NormalizedBookRecord};
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::store::NewBook;

/// Reading status of a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookStatus {
    #[default]
    #[serde(rename = "To Read")]
    ToRead,
    Reading,
    Finished,
}

impl BookStatus {
    pub const ALL: [BookStatus; 3] = [BookStatus::ToRead, BookStatus::Reading, BookStatus::Finished];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::ToRead => "To Read",
            BookStatus::Reading => "Reading",
            BookStatus::Finished => "Finished",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                Error::InvalidInput(
                    "Invalid status. Must be: To Read, Reading, or Finished".to_string(),
                )
            })
    }
}

/// In-progress add-book form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub status: BookStatus,
    pub notes: String,
    pub cover_url: String,
}

impl BookForm {
    /// Merge a resolved record into the form.
    ///
    /// Title, author (first listed) and cover are overwritten whenever the
    /// record carries a value. Notes are user free text: a description only
    /// fills them while they are empty.
    pub fn merge_resolved(&mut self, record: &NormalizedBookRecord) {
        if let Some(title) = &record.title {
            self.title = title.clone();
        }
        if let Some(author) = record.first_author() {
            self.author = author.to_string();
        }
        if let Some(cover_url) = &record.cover_url {
            self.cover_url = cover_url.clone();
        }
        if self.notes.trim().is_empty() {
            if let Some(description) = &record.description {
                self.notes = description.clone();
            }
        }
    }

    /// Validate the lookup fields and build a request for the book-info boundary.
    ///
    /// No network call should be made when this fails.
    pub fn lookup_request(&self) -> Result<BookInfoRequest, LookupError> {
        let isbn_field = non_blank(Some(self.isbn.clone()));
        let title = non_blank(Some(self.title.clone()));
        let author = non_blank(Some(self.author.clone()));

        if isbn_field.is_none() && title.is_none() && author.is_none() {
            return Err(LookupError::MissingInput);
        }

        let isbn = isbn_field
            .map(|raw| Isbn::parse(&raw).map_err(|_| LookupError::InvalidIsbn(raw)))
            .transpose()?
            .map(|isbn| isbn.to_string());

        Ok(BookInfoRequest {
            isbn,
            title,
            author,
        })
    }

    /// Validate the form for submission to the record store.
    ///
    /// Title and author are required; notes and cover become `None` when blank.
    pub fn to_draft(&self) -> bookshelf_common::Result<NewBook> {
        let title = non_blank(Some(self.title.clone()));
        let author = non_blank(Some(self.author.clone()));
        let (Some(title), Some(author)) = (title, author) else {
            return Err(Error::InvalidInput(
                "Title and author are required".to_string(),
            ));
        };

        Ok(NewBook {
            title,
            author,
            status: self.status,
            notes: non_blank(Some(self.notes.clone())),
            cover_url: non_blank(Some(self.cover_url.clone())),
        })
    }
}
