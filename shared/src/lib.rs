//! Shared types for the Blue Oyster console
//!
//! Domain models shared between the admin-API client and the console views.

pub mod models;

// Re-exports
pub use models::Table;
