//! Data models
//!
//! Served by the external admin API and consumed by the console.
//! All IDs are strings as the API hands them out.

pub mod table;

// Re-exports
pub use table::*;
