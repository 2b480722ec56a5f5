//! Walkable surface implementations

pub mod grid;

use crate::config::MargaConfig;
use crate::core::surface::NavSurface;
use crate::error::{Error, Result};
use grid::FloorGrid;

/// Create a walkable surface based on configuration
pub fn create_surface(config: &MargaConfig) -> Result<Box<dyn NavSurface>> {
    match config.surface.kind.as_str() {
        "grid" => {
            let surface = FloorGrid::new(&config.surface)?;
            Ok(Box::new(surface))
        }
        _ => Err(Error::UnknownSurface(config.surface.kind.clone())),
    }
}
