//! lemenu - Recipe Recommendation Service
//!
//! *Le Menu* (The Menu) - CSV catalog loading, Axum HTTP API and CLI for lerecette

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// API error types
pub mod error;

/// HTTP handlers for REST endpoints
pub mod handlers;

/// Service configuration from TOML or environment
pub mod config;

/// Catalog loading from CSV files
pub mod dataset;

/// Request and response types
pub mod responses;

/// Server instance management
pub mod server;

pub use config::ServiceConfig;
pub use dataset::{load_catalog, load_from_dir, sample_catalog, DatasetError};
pub use error::{ApiError, ApiResult};
pub use server::LeMenuServer;
