//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    gateway::ValidationError,
    models::Percentage,
    services::SimulatorConfig,
};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "fox-gateway")]
#[command(about = "HTTP gateway for controlling a FoxESS inverter")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "5080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Simulated round-trip latency of each inverter call, in milliseconds
    #[arg(long, default_value = "0")]
    pub latency_ms: u64,

    /// Battery state-of-charge the simulated inverter starts with
    #[arg(long, default_value = "50")]
    pub initial_soc: u16,

    /// Initial minimum state-of-charge
    #[arg(long, default_value = "10")]
    pub min_soc: u16,

    /// Initial minimum state-of-charge on grid
    #[arg(long, default_value = "10")]
    pub min_grid_soc: u16,

    /// Serial number reported by the simulated cloud device list
    #[arg(long, default_value = "SIM0000000001")]
    pub device_sn: String,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn simulator(&self) -> Result<SimulatorConfig, ValidationError> {
        Ok(SimulatorConfig {
            latency: Duration::from_millis(self.latency_ms),
            initial_soc: Percentage::new("initial-soc", self.initial_soc)?,
            min_soc: Percentage::new("min-soc", self.min_soc)?,
            min_grid_soc: Percentage::new("min-grid-soc", self.min_grid_soc)?,
            device_sn: self.device_sn.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["fox-gateway"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:5080");
        assert_eq!(config.log_level(), "info");

        let simulator = config.simulator().unwrap();
        assert_eq!(simulator.initial_soc.value(), 50);
        assert!(simulator.latency.is_zero());
    }

    #[test]
    fn rejects_out_of_range_initial_thresholds() {
        let config = Config::try_parse_from(["fox-gateway", "--min-soc", "150"]).unwrap();
        assert!(matches!(
            config.simulator(),
            Err(ValidationError::PercentageOutOfRange { field: "min-soc", value: 150 })
        ));
    }
}
