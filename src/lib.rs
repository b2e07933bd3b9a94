//! # country-search
//!
//! A small HTTP service that looks countries up by name, normalizes the
//! REST Countries response to a four-field summary and caches the result for
//! the lifetime of the process.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use country_search::{CountrySearchService, InMemoryCache, RestCountriesClient, Server, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = RestCountriesClient::new("https://restcountries.com/v3.1", Duration::from_secs(10))?;
//!     let service = CountrySearchService::new(Arc::new(InMemoryCache::new()), Arc::new(provider));
//!
//!     let server = Server::bind("127.0.0.1:8080").await?;
//!     server
//!         .serve(Arc::new(api::routes(Arc::new(service))), async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

// ── Lookup core ───────────────────────────────────────────────────────────────
pub mod cache;
pub mod model;
pub mod service;
pub mod upstream;

// ── HTTP boundary ─────────────────────────────────────────────────────────────
pub mod api;
pub mod context;
pub mod http;
pub mod middleware;
pub mod router;
pub mod server;

pub mod config;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cache::{Cache, InMemoryCache};
pub use config::Config;
pub use context::Context;
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use model::{CountrySummary, ErrorBody};
pub use router::Router;
pub use server::{Server, ServerError};
pub use service::CountrySearchService;
pub use upstream::{CountryProvider, RestCountriesClient, UpstreamError};
