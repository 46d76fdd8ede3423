//! Shared test fixtures

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use tokio_util::sync::CancellationToken;

use fox_gateway::{
    api::create_router,
    models::{BatteryConfiguration, Device, LocalWorkMode, Percentage, SetBothBatteryMinSoCRequest},
    services::{DeviceService, ServiceError},
    state::AppState,
    Gateway,
};

/// A device service call as it reached the collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BatteryConfiguration,
    SetMinGridSocToCurrentSoc,
    SetBatteryMinSoc(u16),
    SetBatteryMinGridSoc(u16),
    SetBoth { min_soc: u16, min_grid_soc: u16 },
    AddressValue(u32),
    WorkMode,
    SetWorkMode(LocalWorkMode),
    ForceChargeToday,
    DisableForceCharge,
    CloudForceChargeToday { enable_grid_charging: bool },
    CloudDisableForceCharge,
    CloudSetBoth { min_soc: u16, min_grid_soc: u16 },
    CloudDeviceList,
    CloudSetWorkMode(LocalWorkMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    /// Never resolve; only cancellation ends the call
    Hang,
    FailTransport,
}

/// Records every call and answers from canned data
pub struct RecordingService {
    calls: Mutex<Vec<Call>>,
    tokens: Mutex<Vec<CancellationToken>>,
    behavior: Behavior,
    pub result_code: i32,
    pub battery: BatteryConfiguration,
    pub devices: Vec<Device>,
}

impl RecordingService {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            behavior,
            result_code: 0,
            battery: BatteryConfiguration { min_soc: 12, min_grid_soc: 34 },
            devices: vec![device("SN-B"), device("SN-A"), device("SN-C")],
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Tokens handed to the service, in call order
    pub fn tokens(&self) -> Vec<CancellationToken> {
        self.tokens.lock().unwrap().clone()
    }

    async fn enter(&self, call: Call, ct: &CancellationToken) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        self.tokens.lock().unwrap().push(ct.clone());
        match self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Hang => std::future::pending().await,
            Behavior::FailTransport => {
                Err(ServiceError::Transport("connection refused".to_string()))
            }
        }
    }

    async fn status(&self, call: Call, ct: &CancellationToken) -> Result<i32, ServiceError> {
        self.enter(call, ct).await?;
        Ok(self.result_code)
    }
}

pub fn device(sn: &str) -> Device {
    Device {
        device_id: format!("id-{}", sn),
        device_sn: sn.to_string(),
        module_sn: format!("M{}", sn),
        plant_name: "Test plant".to_string(),
        device_type: "H1-5.0-E".to_string(),
        product_type: "H".to_string(),
        country: "NL".to_string(),
        status: 1,
        has_battery: true,
        has_pv: false,
    }
}

fn both(request: SetBothBatteryMinSoCRequest) -> (u16, u16) {
    (request.min_soc.value(), request.min_grid_soc.value())
}

#[async_trait]
impl DeviceService for RecordingService {
    async fn battery_configuration(
        &self,
        ct: &CancellationToken,
    ) -> Result<BatteryConfiguration, ServiceError> {
        self.enter(Call::BatteryConfiguration, ct).await?;
        Ok(self.battery)
    }

    async fn set_min_grid_soc_to_current_soc(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::SetMinGridSocToCurrentSoc, ct).await
    }

    async fn set_battery_min_soc(
        &self,
        percentage: Percentage,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::SetBatteryMinSoc(percentage.value()), ct).await
    }

    async fn set_battery_min_grid_soc(
        &self,
        percentage: Percentage,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::SetBatteryMinGridSoc(percentage.value()), ct).await
    }

    async fn set_both_battery_min_soc(
        &self,
        request: SetBothBatteryMinSoCRequest,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        let (min_soc, min_grid_soc) = both(request);
        self.status(Call::SetBoth { min_soc, min_grid_soc }, ct).await
    }

    async fn address_value(
        &self,
        address: u32,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.enter(Call::AddressValue(address), ct).await?;
        Ok(4242)
    }

    async fn work_mode(&self, ct: &CancellationToken) -> Result<i32, ServiceError> {
        self.enter(Call::WorkMode, ct).await?;
        Ok(LocalWorkMode::FeedIn.code())
    }

    async fn set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::SetWorkMode(mode), ct).await
    }

    async fn force_charge_today_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::ForceChargeToday, ct).await
    }

    async fn disable_force_charge_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::DisableForceCharge, ct).await
    }

    async fn cloud_force_charge_today_period1(
        &self,
        enable_grid_charging: bool,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::CloudForceChargeToday { enable_grid_charging }, ct).await
    }

    async fn cloud_disable_force_charge_period1(
        &self,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::CloudDisableForceCharge, ct).await
    }

    async fn cloud_set_both_battery_min_soc(
        &self,
        request: SetBothBatteryMinSoCRequest,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        let (min_soc, min_grid_soc) = both(request);
        self.status(Call::CloudSetBoth { min_soc, min_grid_soc }, ct).await
    }

    async fn cloud_device_list(&self, ct: &CancellationToken) -> Result<Vec<Device>, ServiceError> {
        self.enter(Call::CloudDeviceList, ct).await?;
        Ok(self.devices.clone())
    }

    async fn cloud_set_work_mode(
        &self,
        mode: LocalWorkMode,
        ct: &CancellationToken,
    ) -> Result<i32, ServiceError> {
        self.status(Call::CloudSetWorkMode(mode), ct).await
    }
}

pub fn gateway_with(behavior: Behavior) -> (Gateway, Arc<RecordingService>) {
    let service = Arc::new(RecordingService::new(behavior));
    let gateway = Gateway::new(service.clone());
    (gateway, service)
}

pub fn app_with(service: Arc<dyn DeviceService>) -> Router {
    let state = Arc::new(AppState::new(Gateway::new(service), 5080, "127.0.0.1".to_string()));
    create_router(state).unwrap()
}
