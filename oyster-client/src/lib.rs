//! # Oyster Client
//!
//! HTTP client and table registry for the Blue Oyster console.
//!
//! ## Modules
//!
//! - `config`: Client configuration
//! - `error`: Error types
//! - `http`: HTTP client for the external admin API
//! - `registry`: In-memory table registry with the fetch lifecycle

pub mod config;
pub mod error;
pub mod http;
pub mod registry;

pub use config::ClientConfig;
pub use error::{FetchError, FetchResult};
pub use http::HttpClient;
pub use registry::TableRegistry;
