//! Null positioning bridge for platforms without a ranging backend.

use crate::core::bridge::{PositioningBridge, RawBuffer};
use crate::error::{Error, Result};

/// Bridge that never produces a sample.
///
/// Stands in where no positioning hardware exists. Anchor configuration
/// is rejected, so a source wrapping this bridge stays uninitialized
/// and the rest of the pipeline runs without live positioning.
#[derive(Debug, Default)]
pub struct NullBridge;

impl NullBridge {
    /// Create a new null bridge.
    pub fn new() -> Self {
        Self
    }
}

impl PositioningBridge for NullBridge {
    fn acquire_raw(&mut self) -> Option<RawBuffer> {
        None
    }

    fn set_anchor_map(&mut self, _anchor_json: &str) -> Result<()> {
        Err(Error::Bridge(
            "positioning is not available with the null driver".to_string(),
        ))
    }

    fn start(&mut self) -> Result<()> {
        Err(Error::Bridge(
            "positioning is not available with the null driver".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
