//! Collaborator contract for inverter control

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::{
    BatteryConfiguration, Device, LocalWorkMode, Percentage, SetBothBatteryMinSoCRequest,
};

/// Failures reported by a device service. The gateway passes these through
/// without interpreting them.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("device error: {0}")]
    Device(String),

    #[error("operation cancelled")]
    Cancelled,
}

/// Local register access and cloud control of a single inverter.
///
/// Every method takes a cancellation token and must stop promptly once it
/// fires. Status-returning methods yield the raw result code.
#[async_trait]
pub trait DeviceService: Send + Sync {
    async fn battery_configuration(
        &self,
        ct: &CancellationToken,
    ) -> Result<BatteryConfiguration, ServiceError>;

    async fn set_min_grid_soc_to_current_soc(&self, ct: &CancellationToken)
        -> Result<i32, ServiceError>;

    async fn set_battery_min_soc(
        &self,
        percentage: Percentage,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;

    async fn set_battery_min_grid_soc(
        &self,
        percentage: Percentage,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;

    async fn set_both_battery_min_soc(
        &self,
        request: SetBothBatteryMinSoCRequest,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;

    /// Read a raw value from a local register address
    async fn address_value(&self, address: u32, ct: &CancellationToken)
        -> Result<i32, ServiceError>;

    async fn work_mode(&self, ct: &CancellationToken) -> Result<i32, ServiceError>;

    async fn set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;

    async fn force_charge_today_period1(&self, ct: &CancellationToken) -> Result<i32, ServiceError>;

    async fn disable_force_charge_period1(&self, ct: &CancellationToken)
        -> Result<i32, ServiceError>;

    async fn cloud_force_charge_today_period1(
        &self,
        enable_grid_charging: bool,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;

    async fn cloud_disable_force_charge_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;

    async fn cloud_set_both_battery_min_soc(
        &self,
        request: SetBothBatteryMinSoCRequest,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;

    async fn cloud_device_list(&self, ct: &CancellationToken) -> Result<Vec<Device>, ServiceError>;

    async fn cloud_set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError>;
}
