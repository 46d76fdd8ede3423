//! Domain models exchanged with the device service
//!
//! These values are created per request and dropped once the response is sent.

pub mod api_result;
pub mod battery;
pub mod device;
pub mod work_mode;

// Re-export main types
pub use api_result::ApiResult;
pub use battery::{BatteryConfiguration, Percentage, SetBothBatteryMinSoCRequest};
pub use device::Device;
pub use work_mode::LocalWorkMode;
