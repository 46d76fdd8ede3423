//! Device service layer
//!
//! The gateway talks to the inverter only through [`DeviceService`]. The
//! crate ships an in-memory [`SimulatedInverter`] so the server can run
//! without hardware.

pub mod device_service;
pub mod simulator;

// Re-export main types
pub use device_service::{DeviceService, ServiceError};
pub use simulator::{ForceChargeWindow, SimulatedInverter, SimulatorConfig};
