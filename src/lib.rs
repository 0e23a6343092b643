//! # Smart Encyclopedia
//!
//! Article lookup and search over either a bundled local dataset or the
//! live Wikipedia REST API, plus the edge proxy browsers go through.
//!
//! ## Architecture
//!
//! ```text
//! CLI → ArticleResolver → ContentSource (local | remote)
//!                                    ↓
//!                       Store      WikiGateway → Fetcher
//!                                    ↓
//!                               Normalizer
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Search the local dataset
//! smart-encyclopedia search quantum
//!
//! # Read a Wikipedia article
//! smart-encyclopedia --mode remote show "Black hole"
//!
//! # Run the summary proxy
//! smart-encyclopedia serve --listen 127.0.0.1:8788
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// store, fetcher, gateway, resolver.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/smart-encyclopedia/config.toml`, then applies
/// environment overrides.
pub mod config;

/// Core domain models.
///
/// - [`Article`](domain::Article): a record of the local dataset
/// - [`EncyclopediaEntry`](domain::EncyclopediaEntry): a resolved article
/// - [`WikiSearchItem`](domain::WikiSearchItem): one search hit
/// - [`wiki`](domain::wiki): Wikipedia REST response shapes
pub mod domain;

/// Stateless proxy for the Wikipedia summary endpoint.
pub mod edge;

/// HTTP transport.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for GET requests
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Wikipedia REST gateway and proxy selection.
pub mod gateway;

/// Markup stripping, excerpt cleaning and section flattening.
pub mod normalizer;

/// Title resolution over the configured content source.
pub mod resolver;

/// Read-only article store.
///
/// - [`ArticleStore`](store::ArticleStore): lookup and search operations
/// - [`MemoryStore`](store::MemoryStore): in-memory implementation over JSON
pub mod store;
