//! HTTP API handlers for bookshelf-lookup
//!
//! - `POST /api/book-info` resolves book metadata
//! - `GET /health` reports liveness

pub mod book_info;
pub mod health;

pub use book_info::book_info_routes;
pub use health::health_routes;
