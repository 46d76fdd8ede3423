//! Battery thresholds and their validation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gateway::ValidationError;

/// A state-of-charge percentage, guaranteed to be within 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percentage(u16);

impl Percentage {
    pub const MAX: u16 = 100;

    /// Validate a raw value, naming `field` in the error when it is out of range
    pub fn new(field: &'static str, value: u16) -> Result<Self, ValidationError> {
        if value > Self::MAX {
            return Err(ValidationError::PercentageOutOfRange { field, value });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Snapshot of the battery operating thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryConfiguration {
    /// Minimum state-of-charge while running off-grid
    pub min_soc: u16,
    /// Minimum state-of-charge while connected to the grid
    pub min_grid_soc: u16,
}

/// Both minimum state-of-charge thresholds, set together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBothBatteryMinSoCRequest {
    pub min_soc: Percentage,
    pub min_grid_soc: Percentage,
}

impl SetBothBatteryMinSoCRequest {
    pub fn new(min_soc: u16, min_grid_soc: u16) -> Result<Self, ValidationError> {
        Ok(Self {
            min_soc: Percentage::new("minSoc", min_soc)?,
            min_grid_soc: Percentage::new("minSocGrid", min_grid_soc)?,
        })
    }
}
