//! Cloud-reported device descriptor

use serde::{Deserialize, Serialize};

/// An inverter registered with the FoxESS cloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    pub device_sn: String,
    pub module_sn: String,
    pub plant_name: String,
    pub device_type: String,
    pub product_type: String,
    pub country: String,
    /// Cloud status code (1 = online, 2 = fault, 3 = offline)
    pub status: i32,
    pub has_battery: bool,
    pub has_pv: bool,
}
