//! Shared application state
//!
//! Holds the gateway handed to every request handler.

pub mod app_state;

// Re-export main types
pub use app_state::AppState;
