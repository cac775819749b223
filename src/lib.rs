//! HTTP service that watermarks uploaded videos, extracts a thumbnail and
//! publishes both to S3-compatible object storage.

pub mod app;
pub mod common;
pub mod config;
pub mod docs;
pub mod infrastructure;
pub mod middleware;
pub mod modules;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use state::AppState;
