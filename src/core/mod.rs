//! Core abstractions for the guidance pipeline.
//!
//! - [`bridge::PositioningBridge`]: Trait to implement for new positioning backends
//! - [`surface::NavSurface`]: Trait to implement for walkable-surface providers
//! - [`types`]: Coordinates, points, and path structures

pub mod bridge;
pub mod surface;
pub mod types;
