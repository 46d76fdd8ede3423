//! Inverter control gateway
//!
//! Maps externally triggered operations onto [`DeviceService`] calls. Inputs
//! are validated before anything is delegated, and each delegated call is
//! raced against the caller's cancellation token.

use std::{future::Future, sync::Arc};

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    models::{
        ApiResult, BatteryConfiguration, Device, LocalWorkMode, Percentage,
        SetBothBatteryMinSoCRequest,
    },
    services::{DeviceService, ServiceError},
};

/// Input rejected before reaching the device service
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentageOutOfRange { field: &'static str, value: u16 },

    #[error("address must be non-negative, got {0}")]
    NegativeAddress(i32),

    #[error("invalid query: {0}")]
    MalformedQuery(String),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },

    #[error("{operation} failed: {source}")]
    Service {
        operation: &'static str,
        #[source]
        source: ServiceError,
    },
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Stateless front for a device service
#[derive(Clone)]
pub struct Gateway {
    service: Arc<dyn DeviceService>,
}

impl Gateway {
    pub fn new(service: Arc<dyn DeviceService>) -> Self {
        Self { service }
    }

    /// Run a delegated call unless the token fires first.
    ///
    /// `call` is not invoked at all if the token is already cancelled.
    async fn delegate<'a, T, F, Fut>(
        &'a self,
        operation: &'static str,
        ct: &'a CancellationToken,
        call: F,
    ) -> Result<T>
    where
        F: FnOnce(&'a dyn DeviceService) -> Fut,
        Fut: Future<Output = std::result::Result<T, ServiceError>> + 'a,
    {
        if ct.is_cancelled() {
            warn!("{} cancelled before delegation", operation);
            return Err(GatewayError::Cancelled { operation });
        }

        debug!("Delegating {}", operation);
        let outcome = tokio::select! {
            biased;
            _ = ct.cancelled() => {
                warn!("{} cancelled while in flight", operation);
                return Err(GatewayError::Cancelled { operation });
            }
            outcome = call(self.service.as_ref()) => outcome,
        };

        match outcome {
            Ok(value) => Ok(value),
            Err(ServiceError::Cancelled) => {
                warn!("{} cancelled by device service", operation);
                Err(GatewayError::Cancelled { operation })
            }
            Err(source) => {
                warn!("{} failed: {}", operation, source);
                Err(GatewayError::Service { operation, source })
            }
        }
    }

    pub async fn battery_configuration(
        &self,
        ct: &CancellationToken,
    ) -> Result<BatteryConfiguration> {
        self.delegate("battery_configuration", ct, |s| s.battery_configuration(ct))
            .await
    }

    pub async fn set_min_grid_soc_to_current_soc(
        &self,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let code = self
            .delegate("set_min_grid_soc_to_current_soc", ct, |s| {
                s.set_min_grid_soc_to_current_soc(ct)
            })
            .await?;
        info!("Min grid SoC set to current SoC, result={}", code);
        Ok(ApiResult::new(code))
    }

    pub async fn set_battery_min_soc(
        &self,
        percentage: u16,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let percentage = Percentage::new("percentage", percentage)?;
        let code = self
            .delegate("set_battery_min_soc", ct, |s| s.set_battery_min_soc(percentage, ct))
            .await?;
        info!("Min SoC set to {}, result={}", percentage, code);
        Ok(ApiResult::new(code))
    }

    pub async fn set_battery_min_grid_soc(
        &self,
        percentage: u16,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let percentage = Percentage::new("percentage", percentage)?;
        let code = self
            .delegate("set_battery_min_grid_soc", ct, |s| {
                s.set_battery_min_grid_soc(percentage, ct)
            })
            .await?;
        info!("Min grid SoC set to {}, result={}", percentage, code);
        Ok(ApiResult::new(code))
    }

    /// Set both thresholds in one call; atomicity is up to the device service
    pub async fn set_both_battery_min_soc(
        &self,
        min_soc: u16,
        min_grid_soc: u16,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let request = SetBothBatteryMinSoCRequest::new(min_soc, min_grid_soc)?;
        let code = self
            .delegate("set_both_battery_min_soc", ct, |s| {
                s.set_both_battery_min_soc(request, ct)
            })
            .await?;
        info!(
            "Min SoC set to {} and min grid SoC to {}, result={}",
            request.min_soc, request.min_grid_soc, code
        );
        Ok(ApiResult::new(code))
    }

    pub async fn address_value(&self, address: i32, ct: &CancellationToken) -> Result<ApiResult> {
        let address =
            u32::try_from(address).map_err(|_| ValidationError::NegativeAddress(address))?;
        let value = self
            .delegate("address_value", ct, |s| s.address_value(address, ct))
            .await?;
        Ok(ApiResult::new(value))
    }

    pub async fn work_mode(&self, ct: &CancellationToken) -> Result<ApiResult> {
        let code = self.delegate("work_mode", ct, |s| s.work_mode(ct)).await?;
        Ok(ApiResult::new(code))
    }

    pub async fn set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let code = self
            .delegate("set_work_mode", ct, |s| s.set_work_mode(mode, ct))
            .await?;
        info!("Local work mode set to {}, result={}", mode, code);
        Ok(ApiResult::new(code))
    }

    pub async fn force_charge_today_period1(&self, ct: &CancellationToken) -> Result<ApiResult> {
        let code = self
            .delegate("force_charge_today_period1", ct, |s| s.force_charge_today_period1(ct))
            .await?;
        info!("Local force charge period 1 enabled for today, result={}", code);
        Ok(ApiResult::new(code))
    }

    pub async fn disable_force_charge_period1(&self, ct: &CancellationToken) -> Result<ApiResult> {
        let code = self
            .delegate("disable_force_charge_period1", ct, |s| {
                s.disable_force_charge_period1(ct)
            })
            .await?;
        info!("Local force charge period 1 disabled, result={}", code);
        Ok(ApiResult::new(code))
    }

    pub async fn cloud_force_charge_today_period1(
        &self,
        enable_grid_charging: bool,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let code = self
            .delegate("cloud_force_charge_today_period1", ct, |s| {
                s.cloud_force_charge_today_period1(enable_grid_charging, ct)
            })
            .await?;
        info!(
            "Cloud force charge period 1 enabled for today (grid charging: {}), result={}",
            enable_grid_charging, code
        );
        Ok(ApiResult::new(code))
    }

    pub async fn cloud_disable_force_charge_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let code = self
            .delegate("cloud_disable_force_charge_period1", ct, |s| {
                s.cloud_disable_force_charge_period1(ct)
            })
            .await?;
        info!("Cloud force charge period 1 disabled, result={}", code);
        Ok(ApiResult::new(code))
    }

    pub async fn cloud_set_both_battery_min_soc(
        &self,
        min_soc: u16,
        min_grid_soc: u16,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let request = SetBothBatteryMinSoCRequest::new(min_soc, min_grid_soc)?;
        let code = self
            .delegate("cloud_set_both_battery_min_soc", ct, |s| {
                s.cloud_set_both_battery_min_soc(request, ct)
            })
            .await?;
        info!(
            "Cloud min SoC set to {} and min grid SoC to {}, result={}",
            request.min_soc, request.min_grid_soc, code
        );
        Ok(ApiResult::new(code))
    }

    /// Devices in the order the cloud reported them
    pub async fn cloud_device_list(&self, ct: &CancellationToken) -> Result<Vec<Device>> {
        self.delegate("cloud_device_list", ct, |s| s.cloud_device_list(ct))
            .await
    }

    pub async fn cloud_set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<ApiResult> {
        let code = self
            .delegate("cloud_set_work_mode", ct, |s| s.cloud_set_work_mode(mode, ct))
            .await?;
        info!("Cloud work mode set to {}, result={}", mode, code);
        Ok(ApiResult::new(code))
    }
}
