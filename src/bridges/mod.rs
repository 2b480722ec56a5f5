//! Positioning bridge implementations

pub mod noise;
pub mod null;
pub mod sim;

use crate::config::MargaConfig;
use crate::core::bridge::PositioningBridge;
use crate::error::{Error, Result};
use null::NullBridge;
use sim::SimBridge;

/// Create a positioning bridge based on configuration
pub fn create_bridge(config: &MargaConfig) -> Result<Box<dyn PositioningBridge>> {
    match config.source.driver.as_str() {
        "sim" => Ok(Box::new(SimBridge::new(config.sim.clone()))),
        "null" => Ok(Box::new(NullBridge::new())),
        _ => Err(Error::UnknownDriver(config.source.driver.clone())),
    }
}
