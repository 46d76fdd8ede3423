//! HTTP API module
//!
//! Routes are declared in one explicit table. [`create_router`] validates the
//! table before turning it into an axum [`Router`].

pub mod extract;
pub mod handlers;
pub mod responses;

use std::{collections::HashSet, fmt, sync::Arc};

use axum::{
    handler::Handler,
    routing::{get, post, MethodRouter},
    Router,
};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Prefix shared by all inverter control routes
pub const FOXESS_PREFIX: &str = "/FoxESS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMethod::Get => f.pad("GET"),
            RouteMethod::Post => f.pad("POST"),
        }
    }
}

/// One entry of the route table
pub struct RouteSpec {
    pub method: RouteMethod,
    pub path: String,
    pub summary: &'static str,
    handler: MethodRouter<Arc<AppState>>,
}

impl RouteSpec {
    pub fn get<H, T>(path: impl Into<String>, summary: &'static str, handler: H) -> Self
    where
        H: Handler<T, Arc<AppState>>,
        T: 'static,
    {
        Self {
            method: RouteMethod::Get,
            path: path.into(),
            summary,
            handler: get(handler),
        }
    }

    pub fn post<H, T>(path: impl Into<String>, summary: &'static str, handler: H) -> Self
    where
        H: Handler<T, Arc<AppState>>,
        T: 'static,
    {
        Self {
            method: RouteMethod::Post,
            path: path.into(),
            summary,
            handler: post(handler),
        }
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("summary", &self.summary)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route path must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("route path has an empty segment: {0}")]
    EmptySegment(String),

    #[error("route path registered twice: {0}")]
    Duplicate(String),
}

fn foxess(path: &str) -> String {
    format!("{}/{}", FOXESS_PREFIX, path)
}

/// Every endpoint the server exposes
pub fn route_table() -> Vec<RouteSpec> {
    vec![
        RouteSpec::get(
            foxess("Local/BatteryConfiguration"),
            "Battery thresholds",
            battery_configuration_handler,
        ),
        RouteSpec::post(
            foxess("Local/SetBatteryMinGridSoCToCurrentSoc"),
            "Min grid SoC := current SoC",
            set_min_grid_soc_to_current_soc_handler,
        ),
        RouteSpec::post(
            foxess("Local/SetBatteryMinSoC"),
            "Set min SoC",
            set_battery_min_soc_handler,
        ),
        RouteSpec::post(
            foxess("Local/SetBatteryMinGridSoC"),
            "Set min grid SoC",
            set_battery_min_grid_soc_handler,
        ),
        RouteSpec::post(
            foxess("Local/SetBothBatteryMinSoC"),
            "Set both min SoC values",
            set_both_battery_min_soc_handler,
        ),
        RouteSpec::get(
            foxess("Local/GetAddressValue"),
            "Read register value",
            address_value_handler,
        ),
        RouteSpec::get(
            foxess("Local/WorkMode"),
            "Current work mode",
            work_mode_handler,
        ),
        RouteSpec::post(
            foxess("Local/SetWorkModeSelfUse"),
            "Work mode self-use",
            set_work_mode_self_use_handler,
        ),
        RouteSpec::post(
            foxess("Local/SetWorkModeFeedIn"),
            "Work mode feed-in",
            set_work_mode_feed_in_handler,
        ),
        RouteSpec::post(
            foxess("Local/SetWorkModeBackUp"),
            "Work mode backup",
            set_work_mode_backup_handler,
        ),
        RouteSpec::post(
            foxess("Local/ForceChargeForTodayTimePeriod1"),
            "Force charge rest of today",
            force_charge_today_handler,
        ),
        RouteSpec::post(
            foxess("Local/DisableForceChargeTimePeriod1"),
            "Disable force charge",
            disable_force_charge_handler,
        ),
        RouteSpec::post(
            foxess("Cloud/ForceChargeForTodayTimePeriod1"),
            "Cloud force charge rest of today",
            cloud_force_charge_today_handler,
        ),
        RouteSpec::post(
            foxess("Cloud/DisableForceChargeTimePeriod1"),
            "Cloud disable force charge",
            cloud_disable_force_charge_handler,
        ),
        RouteSpec::post(
            foxess("Cloud/SetBothBatteryMinSoC"),
            "Cloud set both min SoC values",
            cloud_set_both_battery_min_soc_handler,
        ),
        RouteSpec::get(
            foxess("Cloud/DeviceList"),
            "Cloud device list",
            cloud_device_list_handler,
        ),
        RouteSpec::post(
            foxess("Cloud/WorkMode/FeedIn"),
            "Cloud work mode feed-in",
            cloud_work_mode_feed_in_handler,
        ),
        RouteSpec::post(
            foxess("Cloud/WorkMode/SelfUse"),
            "Cloud work mode self-use",
            cloud_work_mode_self_use_handler,
        ),
        RouteSpec::post(
            foxess("Cloud/WorkMode/Backup"),
            "Cloud work mode backup",
            cloud_work_mode_backup_handler,
        ),
        RouteSpec::get("/health", "Health check", health_handler),
    ]
}

/// Check that every path is well formed and registered once
pub fn validate_routes(routes: &[RouteSpec]) -> Result<(), RouteError> {
    let mut seen = HashSet::new();
    for route in routes {
        let Some(rest) = route.path.strip_prefix('/') else {
            return Err(RouteError::MissingLeadingSlash(route.path.clone()));
        };
        if rest.split('/').any(str::is_empty) {
            return Err(RouteError::EmptySegment(route.path.clone()));
        }
        if !seen.insert(route.path.as_str()) {
            return Err(RouteError::Duplicate(route.path.clone()));
        }
    }
    Ok(())
}

/// Build a router from a validated table
pub fn build_router(routes: Vec<RouteSpec>, state: Arc<AppState>) -> Result<Router, RouteError> {
    validate_routes(&routes)?;

    let router = routes
        .into_iter()
        .fold(Router::new(), |router, route| router.route(&route.path, route.handler));

    Ok(router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state))
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Result<Router, RouteError> {
    build_router(route_table(), state)
}
