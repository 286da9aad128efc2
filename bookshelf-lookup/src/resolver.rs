//! Resolution orchestrator
//!
//! Turns a [`LookupQuery`] into a single [`NormalizedBookRecord`] by walking an
//! ordered chain of provider steps and stopping at the first acceptable
//! result. The chain is plain data: adding, removing or reordering providers
//! means editing the step list, not the control flow.
//!
//! The standard chain is:
//! 1. Open Library by ISBN
//! 2. Google Books by `isbn:` query
//! 3. Open Library search, accepted only with a cover or description
//! 4. Google Books `intitle:`/`inauthor:` search
//!
//! Identifier steps run only when the query has an ISBN; text steps only when
//! it has a title or author. When every step misses, the caller's own
//! title/author come back as a `none`-source stub.

use std::sync::Arc;

use bookshelf_common::{LookupQuery, NormalizedBookRecord};
use tracing::{debug, info};

use crate::providers::{GoogleBooksClient, OpenLibraryClient};
use crate::types::{IdentifierLookup, TextLookup};

/// One entry in the fallback chain
#[derive(Clone)]
pub enum ResolutionStep {
    /// Lookup by canonical ISBN
    Identifier(Arc<dyn IdentifierLookup>),
    /// Lookup by title/author
    Text {
        provider: Arc<dyn TextLookup>,
        /// Reject hits that carry neither a cover nor a description
        require_enrichment: bool,
    },
}

impl ResolutionStep {
    fn name(&self) -> &'static str {
        match self {
            ResolutionStep::Identifier(provider) => provider.name(),
            ResolutionStep::Text { provider, .. } => provider.name(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ResolutionStep::Identifier(_) => "identifier",
            ResolutionStep::Text { .. } => "text",
        }
    }

    /// Run this step against the query.
    ///
    /// `None` when the step does not apply, the provider misses, or the hit
    /// fails the step's acceptance gate.
    async fn attempt(&self, query: &LookupQuery) -> Option<NormalizedBookRecord> {
        match self {
            ResolutionStep::Identifier(provider) => {
                let isbn = query.isbn()?;
                provider.lookup_isbn(isbn).await
            }
            ResolutionStep::Text {
                provider,
                require_enrichment,
            } => {
                if !query.has_text() {
                    return None;
                }
                let record = provider.lookup_text(query.title(), query.author()).await?;
                if *require_enrichment && !record.has_enrichment() {
                    debug!(
                        provider = provider.name(),
                        "Bare text match without cover or description, falling through"
                    );
                    return None;
                }
                Some(record)
            }
        }
    }
}

/// Ordered provider fallback chain
#[derive(Clone, Default)]
pub struct ResolutionChain {
    steps: Vec<ResolutionStep>,
}

impl ResolutionChain {
    pub fn new(steps: Vec<ResolutionStep>) -> Self {
        Self { steps }
    }

    /// Open Library first, Google Books second, identifiers before text
    pub fn standard(open_library: Arc<OpenLibraryClient>, google_books: Arc<GoogleBooksClient>) -> Self {
        Self::new(vec![
            ResolutionStep::Identifier(open_library.clone()),
            ResolutionStep::Identifier(google_books.clone()),
            ResolutionStep::Text {
                provider: open_library,
                require_enrichment: true,
            },
            ResolutionStep::Text {
                provider: google_books,
                require_enrichment: false,
            },
        ])
    }

    /// Append a step
    pub fn then(mut self, step: ResolutionStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Resolution orchestrator
///
/// Never fails: a total miss is represented by the stub record.
#[derive(Clone)]
pub struct Resolver {
    chain: ResolutionChain,
}

impl Resolver {
    pub fn new(chain: ResolutionChain) -> Self {
        Self { chain }
    }

    /// Resolve a query to the best available record
    pub async fn resolve(&self, query: &LookupQuery) -> NormalizedBookRecord {
        for step in &self.chain.steps {
            let outcome = step.attempt(query).await;
            debug!(
                provider = step.name(),
                step = step.kind(),
                accepted = outcome.is_some(),
                "Resolution step finished"
            );

            if let Some(record) = outcome {
                info!(
                    source = record.source.as_str(),
                    isbn = ?query.isbn(),
                    title = ?record.title,
                    "Book metadata resolved"
                );
                return record;
            }
        }

        info!(
            isbn = ?query.isbn(),
            title = ?query.title(),
            author = ?query.author(),
            "No provider had metadata, returning stub"
        );
        NormalizedBookRecord::stub(query.title(), query.author())
    }
}

// ============================================================================
// Tests
// ============================================================================
