//! bookshelf-ui - interactive add-book form support
//!
//! Client-side pieces around metadata resolution:
//! - [`controller::LookupController`] watches the ISBN field, debounces edits
//!   and merges resolved metadata into the form
//! - [`form::BookForm`] holds in-progress form state and its merge rules
//! - [`client::BookInfoClient`] is the request boundary to bookshelf-lookup
//! - [`store::RecordStore`] is the record store a finished form is submitted to

pub mod client;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod form;
pub mod store;

pub use controller::{LookupController, ResolveOutcome, TriggerState};
pub use error::LookupError;
pub use form::{BookForm, BookStatus};
