//! HTTP endpoint handlers
//!
//! Each handler owns a fresh cancellation token. The drop guard fires it when
//! axum drops the handler future, e.g. because the client went away.

use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Deserialize;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::{
    extract::{deserialize_flexible_bool, ApiQuery},
    responses::HealthResponse,
};
use crate::{
    gateway::GatewayError,
    models::{ApiResult, BatteryConfiguration, Device, LocalWorkMode},
    state::AppState,
};

type ApiResponse<T> = Result<Json<T>, GatewayError>;

const DEFAULT_PERCENTAGE: u16 = 10;

fn default_percentage() -> u16 {
    DEFAULT_PERCENTAGE
}

// Keys arrive lower-cased from `ApiQuery`; unknown keys are rejected.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PercentageQuery {
    #[serde(default = "default_percentage")]
    pub percentage: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BothSocQuery {
    #[serde(rename = "minsoc", default = "default_percentage")]
    pub min_soc: u16,
    #[serde(rename = "minsocgrid", default = "default_percentage")]
    pub min_soc_grid: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressQuery {
    #[serde(default)]
    pub address: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridChargingQuery {
    #[serde(
        rename = "enablegridcharging",
        default,
        deserialize_with = "deserialize_flexible_bool"
    )]
    pub enable_grid_charging: bool,
}

fn request_scope() -> (CancellationToken, DropGuard) {
    let ct = CancellationToken::new();
    let guard = ct.clone().drop_guard();
    (ct, guard)
}

/// Handle GET /FoxESS/Local/BatteryConfiguration
pub async fn battery_configuration_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<BatteryConfiguration> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.battery_configuration(&ct).await?))
}

/// Handle POST /FoxESS/Local/SetBatteryMinGridSoCToCurrentSoc
pub async fn set_min_grid_soc_to_current_soc_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.set_min_grid_soc_to_current_soc(&ct).await?))
}

/// Handle POST /FoxESS/Local/SetBatteryMinSoC
pub async fn set_battery_min_soc_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PercentageQuery>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.set_battery_min_soc(query.percentage, &ct).await?))
}

/// Handle POST /FoxESS/Local/SetBatteryMinGridSoC
pub async fn set_battery_min_grid_soc_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PercentageQuery>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.set_battery_min_grid_soc(query.percentage, &ct).await?))
}

/// Handle POST /FoxESS/Local/SetBothBatteryMinSoC
pub async fn set_both_battery_min_soc_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<BothSocQuery>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    let result = state
        .gateway
        .set_both_battery_min_soc(query.min_soc, query.min_soc_grid, &ct)
        .await?;
    Ok(Json(result))
}

/// Handle GET /FoxESS/Local/GetAddressValue
pub async fn address_value_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<AddressQuery>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.address_value(query.address, &ct).await?))
}

/// Handle GET /FoxESS/Local/WorkMode
pub async fn work_mode_handler(State(state): State<Arc<AppState>>) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.work_mode(&ct).await?))
}

async fn set_local_work_mode(state: &AppState, mode: LocalWorkMode) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.set_work_mode(mode, &ct).await?))
}

/// Handle POST /FoxESS/Local/SetWorkModeSelfUse
pub async fn set_work_mode_self_use_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    set_local_work_mode(&state, LocalWorkMode::SelfUse).await
}

/// Handle POST /FoxESS/Local/SetWorkModeFeedIn
pub async fn set_work_mode_feed_in_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    set_local_work_mode(&state, LocalWorkMode::FeedIn).await
}

/// Handle POST /FoxESS/Local/SetWorkModeBackUp
pub async fn set_work_mode_backup_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    set_local_work_mode(&state, LocalWorkMode::Backup).await
}

/// Handle POST /FoxESS/Local/ForceChargeForTodayTimePeriod1
pub async fn force_charge_today_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.force_charge_today_period1(&ct).await?))
}

/// Handle POST /FoxESS/Local/DisableForceChargeTimePeriod1
pub async fn disable_force_charge_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.disable_force_charge_period1(&ct).await?))
}

/// Handle POST /FoxESS/Cloud/ForceChargeForTodayTimePeriod1
pub async fn cloud_force_charge_today_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<GridChargingQuery>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    let result = state
        .gateway
        .cloud_force_charge_today_period1(query.enable_grid_charging, &ct)
        .await?;
    Ok(Json(result))
}

/// Handle POST /FoxESS/Cloud/DisableForceChargeTimePeriod1
pub async fn cloud_disable_force_charge_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.cloud_disable_force_charge_period1(&ct).await?))
}

/// Handle POST /FoxESS/Cloud/SetBothBatteryMinSoC
pub async fn cloud_set_both_battery_min_soc_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<BothSocQuery>,
) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    let result = state
        .gateway
        .cloud_set_both_battery_min_soc(query.min_soc, query.min_soc_grid, &ct)
        .await?;
    Ok(Json(result))
}

/// Handle GET /FoxESS/Cloud/DeviceList
pub async fn cloud_device_list_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<Vec<Device>> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.cloud_device_list(&ct).await?))
}

async fn set_cloud_work_mode(state: &AppState, mode: LocalWorkMode) -> ApiResponse<ApiResult> {
    let (ct, _guard) = request_scope();
    Ok(Json(state.gateway.cloud_set_work_mode(mode, &ct).await?))
}

/// Handle POST /FoxESS/Cloud/WorkMode/FeedIn
pub async fn cloud_work_mode_feed_in_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    set_cloud_work_mode(&state, LocalWorkMode::FeedIn).await
}

/// Handle POST /FoxESS/Cloud/WorkMode/SelfUse
pub async fn cloud_work_mode_self_use_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    set_cloud_work_mode(&state, LocalWorkMode::SelfUse).await
}

/// Handle POST /FoxESS/Cloud/WorkMode/Backup
pub async fn cloud_work_mode_backup_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResponse<ApiResult> {
    set_cloud_work_mode(&state, LocalWorkMode::Backup).await
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        state.get_uptime(),
        state.host.clone(),
        state.port,
    ))
}
