//! In-memory inverter used when no hardware is attached

use std::{
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use chrono::{Local, NaiveTime, Timelike};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{DeviceService, ServiceError};
use crate::models::{
    BatteryConfiguration, Device, LocalWorkMode, Percentage, SetBothBatteryMinSoCRequest,
};

/// Simulated register addresses readable through `address_value`
pub const REG_SOC: u32 = 11036;
pub const REG_MIN_SOC: u32 = 41009;
pub const REG_MIN_GRID_SOC: u32 = 41011;
pub const REG_WORK_MODE: u32 = 41000;

const RESULT_OK: i32 = 0;

/// Settings for a [`SimulatedInverter`]
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Delay applied to every call before it touches state
    pub latency: Duration,
    pub initial_soc: Percentage,
    pub min_soc: Percentage,
    pub min_grid_soc: Percentage,
    pub device_sn: String,
}

/// Force-charge time period 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceChargeWindow {
    pub enabled: bool,
    pub grid_charging: bool,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ForceChargeWindow {
    fn disabled() -> Self {
        Self {
            enabled: false,
            grid_charging: false,
            start: NaiveTime::default(),
            end: NaiveTime::default(),
        }
    }

    /// Window from the current minute until the end of the day
    fn rest_of_today(grid_charging: bool) -> Self {
        let now = Local::now().time();
        let start = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or_default();
        let end = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default();
        Self {
            enabled: true,
            grid_charging,
            start,
            end,
        }
    }
}

#[derive(Debug, Clone)]
struct InverterState {
    soc: u16,
    min_soc: u16,
    min_grid_soc: u16,
    work_mode: LocalWorkMode,
    local_force_charge: ForceChargeWindow,
    cloud_force_charge: ForceChargeWindow,
}

/// Device service backed by process memory
#[derive(Debug)]
pub struct SimulatedInverter {
    latency: Duration,
    state: Mutex<InverterState>,
    devices: Vec<Device>,
}

impl SimulatedInverter {
    pub fn new(config: SimulatorConfig) -> Self {
        let state = InverterState {
            soc: config.initial_soc.value(),
            min_soc: config.min_soc.value(),
            min_grid_soc: config.min_grid_soc.value(),
            work_mode: LocalWorkMode::SelfUse,
            local_force_charge: ForceChargeWindow::disabled(),
            cloud_force_charge: ForceChargeWindow::disabled(),
        };

        let devices = vec![Device {
            device_id: format!("sim-{}", config.device_sn),
            device_sn: config.device_sn.clone(),
            module_sn: format!("M{}", config.device_sn),
            plant_name: "Simulated plant".to_string(),
            device_type: "H1-5.0-E".to_string(),
            product_type: "H".to_string(),
            country: "GB".to_string(),
            status: 1,
            has_battery: true,
            has_pv: true,
        }];

        Self {
            latency: config.latency,
            state: Mutex::new(state),
            devices,
        }
    }

    /// Change the simulated battery charge level
    pub fn set_soc(&self, soc: Percentage) -> Result<(), ServiceError> {
        self.with_state(|state| state.soc = soc.value())
    }

    /// Window last set through the local protocol
    pub fn local_force_charge_window(&self) -> Result<ForceChargeWindow, ServiceError> {
        self.with_state(|state| state.local_force_charge)
    }

    /// Window last set through the cloud API
    pub fn cloud_force_charge_window(&self) -> Result<ForceChargeWindow, ServiceError> {
        self.with_state(|state| state.cloud_force_charge)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut InverterState) -> T) -> Result<T, ServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| ServiceError::Device(format!("Failed to lock inverter state: {}", e)))?;
        Ok(f(&mut state))
    }

    /// Wait out the configured latency, bailing out on cancellation
    async fn round_trip(&self, ct: &CancellationToken) -> Result<(), ServiceError> {
        if ct.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        if self.latency.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = ct.cancelled() => Err(ServiceError::Cancelled),
            _ = sleep(self.latency) => Ok(()),
        }
    }

    fn set_both(&self, request: SetBothBatteryMinSoCRequest) -> Result<i32, ServiceError> {
        self.with_state(|state| {
            state.min_soc = request.min_soc.value();
            state.min_grid_soc = request.min_grid_soc.value();
        })?;
        info!(
            "Simulator thresholds set: min_soc={}, min_grid_soc={}",
            request.min_soc, request.min_grid_soc
        );
        Ok(RESULT_OK)
    }

    fn apply_work_mode(&self, mode: LocalWorkMode) -> Result<i32, ServiceError> {
        self.with_state(|state| state.work_mode = mode)?;
        info!("Simulator work mode set to {}", mode);
        Ok(RESULT_OK)
    }

    fn apply_local_force_charge(&self, window: ForceChargeWindow) -> Result<i32, ServiceError> {
        self.with_state(|state| state.local_force_charge = window)?;
        debug!("Simulator local force charge window: {:?}", window);
        Ok(RESULT_OK)
    }

    fn apply_cloud_force_charge(&self, window: ForceChargeWindow) -> Result<i32, ServiceError> {
        self.with_state(|state| state.cloud_force_charge = window)?;
        debug!("Simulator cloud force charge window: {:?}", window);
        Ok(RESULT_OK)
    }
}

#[async_trait]
impl DeviceService for SimulatedInverter {
    async fn battery_configuration(
        &self,
        ct: &CancellationToken,
    ) -> Result<BatteryConfiguration, ServiceError> {
        self.round_trip(ct).await?;
        self.with_state(|state| BatteryConfiguration {
            min_soc: state.min_soc,
            min_grid_soc: state.min_grid_soc,
        })
    }

    async fn set_min_grid_soc_to_current_soc(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        let soc = self.with_state(|state| {
            state.min_grid_soc = state.soc;
            state.soc
        })?;
        info!("Simulator min grid SoC set to current SoC {}%", soc);
        Ok(RESULT_OK)
    }

    async fn set_battery_min_soc(
        &self,
        percentage: Percentage,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.with_state(|state| state.min_soc = percentage.value())?;
        Ok(RESULT_OK)
    }

    async fn set_battery_min_grid_soc(
        &self,
        percentage: Percentage,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.with_state(|state| state.min_grid_soc = percentage.value())?;
        Ok(RESULT_OK)
    }

    async fn set_both_battery_min_soc(
        &self,
        request: SetBothBatteryMinSoCRequest,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.set_both(request)
    }

    async fn address_value(
        &self,
        address: u32,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        let value = self.with_state(|state| match address {
            REG_SOC => Some(i32::from(state.soc)),
            REG_MIN_SOC => Some(i32::from(state.min_soc)),
            REG_MIN_GRID_SOC => Some(i32::from(state.min_grid_soc)),
            REG_WORK_MODE => Some(state.work_mode.code()),
            _ => None,
        })?;
        value.ok_or_else(|| ServiceError::Device(format!("illegal data address {}", address)))
    }

    async fn work_mode(&self, ct: &CancellationToken) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.with_state(|state| state.work_mode.code())
    }

    async fn set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.apply_work_mode(mode)
    }

    async fn force_charge_today_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.apply_local_force_charge(ForceChargeWindow::rest_of_today(true))
    }

    async fn disable_force_charge_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.apply_local_force_charge(ForceChargeWindow::disabled())
    }

    async fn cloud_force_charge_today_period1(
        &self,
        enable_grid_charging: bool,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.apply_cloud_force_charge(ForceChargeWindow::rest_of_today(enable_grid_charging))
    }

    async fn cloud_disable_force_charge_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.apply_cloud_force_charge(ForceChargeWindow::disabled())
    }

    async fn cloud_set_both_battery_min_soc(
        &self,
        request: SetBothBatteryMinSoCRequest,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.set_both(request)
    }

    async fn cloud_device_list(&self, ct: &CancellationToken) -> Result<Vec<Device>, ServiceError> {
        self.round_trip(ct).await?;
        Ok(self.devices.clone())
    }

    async fn cloud_set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.round_trip(ct).await?;
        self.apply_work_mode(mode)
    }
}
