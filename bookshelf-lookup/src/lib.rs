//! bookshelf-lookup library interface
//!
//! Book-metadata resolution: provider adapters, the fallback orchestrator and
//! the HTTP boundary in front of them. Exposed as a library for integration
//! testing and embedding.

pub mod api;
pub mod error;
pub mod http;
pub mod providers;
pub mod resolver;
pub mod types;

pub use crate::error::{ApiError, ApiResult};
pub use crate::resolver::{ResolutionChain, ResolutionStep, Resolver};

use std::sync::Arc;

use axum::Router;
use bookshelf_common::config::ProvidersConfig;
use chrono::{DateTime, Utc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::http::ReqwestFetcher;
use crate::providers::{GoogleBooksClient, OpenLibraryClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolution orchestrator
    pub resolver: Arc<Resolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
            startup_time: Utc::now(),
        }
    }

    /// Wire the standard provider chain over a real HTTP client
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, reqwest::Error> {
        let fetcher = Arc::new(ReqwestFetcher::new(config)?);
        let open_library = Arc::new(OpenLibraryClient::new(fetcher.clone(), config));
        let google_books = Arc::new(GoogleBooksClient::new(fetcher, config));

        Ok(Self::new(Resolver::new(ResolutionChain::standard(
            open_library,
            google_books,
        ))))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::book_info_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
