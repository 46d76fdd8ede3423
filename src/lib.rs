//! fox-gateway - HTTP gateway for a FoxESS solar inverter
//!
//! This library exposes local and cloud inverter controls over HTTP and
//! forwards every request to a pluggable device service.

pub mod api;
pub mod config;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use gateway::{Gateway, GatewayError};
pub use services::{DeviceService, ServiceError, SimulatedInverter};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
