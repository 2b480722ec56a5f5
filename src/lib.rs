//! MargaNav - Indoor guidance library over external positioning
//!
//! This library provides the core components for turning raw planar
//! position fixes into a smoothed agent position and a continuously
//! replanned guidance path across a navigable surface.
//!
//! ## Pipeline
//!
//! bridge -> source -> frame -> tracking -> planner -> visualizer,
//! with a readiness gate holding the pipeline back until the surface
//! has data and the source is initialized.

pub mod agent;
pub mod anchors;
pub mod bridges;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod planner;
pub mod readiness;
pub mod source;
pub mod surfaces;
pub mod tracking;
pub mod visualizer;

// Re-export commonly used types
pub use config::MargaConfig;
pub use error::{Error, Result};
