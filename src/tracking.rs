//! Snap-and-ease position tracking over the navigable surface.
//!
//! Raw positioning fixes are noisy and land slightly off the walkable
//! plane. Each accepted sample is snapped to the nearest navigable
//! point within `sample_radius`, and the tracked position eases toward
//! the snapped point with an exponential approach (`follow_speed * dt`,
//! clamped to 1.0), so the agent glides instead of jumping between
//! fixes.
//!
//! Samples that snap nowhere within the radius are rejected and leave
//! the tracked position untouched. Ticks without a sample hold the
//! position bit-for-bit.

use log::debug;

use crate::config::TrackingConfig;
use crate::core::surface::NavSurface;
use crate::core::types::{NavPoint, RawCoordinate};
use crate::frame;

/// Position filter tracking the agent across the navigable surface.
#[derive(Debug)]
pub struct PositionFilter {
    /// Configuration
    config: TrackingConfig,

    /// Smoothed agent position in the navigation frame
    position: NavPoint,

    /// Most recent sample that snapped onto the surface
    last_known: Option<NavPoint>,

    /// Number of samples accepted
    accepted_count: u64,

    /// Number of samples rejected as off-surface
    rejected_count: u64,
}

impl PositionFilter {
    /// Create a filter starting from the given position.
    pub fn new(config: &TrackingConfig, start: NavPoint) -> Self {
        Self {
            config: config.clone(),
            position: start,
            last_known: None,
            accepted_count: 0,
            rejected_count: 0,
        }
    }

    /// Advance the filter by one tick.
    ///
    /// `dt` is the tick duration in seconds; `sample` is the coordinate
    /// acquired this tick, if any. The sample is mapped into the
    /// navigation frame at the current height before the surface query,
    /// so the source never influences the vertical coordinate.
    pub fn advance(&mut self, dt: f32, sample: Option<RawCoordinate>, surface: &dyn NavSurface) {
        let raw = match sample {
            Some(raw) => raw,
            // Hold the position until the source recovers
            None => return,
        };

        let candidate = frame::to_nav(raw, self.position.y);
        match surface.sample_nearest(&candidate, self.config.sample_radius) {
            Some(snapped) => {
                self.last_known = Some(snapped);
                self.accepted_count += 1;
                let t = (self.config.follow_speed * dt).clamp(0.0, 1.0);
                self.position = self.position.lerp(&snapped, t);
            }
            None => {
                self.rejected_count += 1;
                debug!(
                    "Sample ({:.2}, {:.2}) is off the walkable surface within {:.2} m, holding",
                    raw.x, raw.y, self.config.sample_radius
                );
            }
        }
    }

    /// Smoothed agent position.
    #[inline]
    pub fn position(&self) -> NavPoint {
        self.position
    }

    /// Force the tracked position, bypassing the easing.
    ///
    /// Used once at activation to place the agent onto the surface.
    pub fn set_position(&mut self, position: NavPoint) {
        self.position = position;
    }

    /// Most recent sample that snapped onto the surface.
    #[inline]
    pub fn last_known(&self) -> Option<NavPoint> {
        self.last_known
    }

    /// Number of samples accepted onto the surface.
    #[inline]
    pub fn accepted_count(&self) -> u64 {
        self.accepted_count
    }

    /// Number of samples rejected as off-surface.
    #[inline]
    pub fn rejected_count(&self) -> u64 {
        self.rejected_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceConfig;
    use crate::surfaces::grid::FloorGrid;

    fn open_room() -> FloorGrid {
        let config = SurfaceConfig {
            max_x: 10.0,
            max_z: 10.0,
            ..SurfaceConfig::default()
        };
        FloorGrid::new(&config).unwrap()
    }

    fn filter_at(x: f32, y: f32, z: f32) -> PositionFilter {
        let config = TrackingConfig {
            follow_speed: 5.0,
            sample_radius: 0.3,
        };
        PositionFilter::new(&config, NavPoint::new(x, y, z))
    }

    #[test]
    fn test_holds_position_without_samples() {
        let grid = open_room();
        let mut filter = filter_at(2.0, 0.0, 3.0);
        let before = filter.position();

        for _ in 0..5 {
            filter.advance(0.033, None, &grid);
        }

        assert_eq!(filter.position(), before);
        assert_eq!(filter.accepted_count(), 0);
        assert_eq!(filter.rejected_count(), 0);
        assert!(filter.last_known().is_none());
    }

    #[test]
    fn test_snapped_sample_becomes_last_known() {
        let grid = open_room();
        let mut filter = filter_at(1.0, 0.0, 1.0);

        filter.advance(0.1, Some(RawCoordinate::new(5.0, 5.0)), &grid);

        assert_eq!(filter.accepted_count(), 1);
        let last = filter.last_known().unwrap();
        assert!((last.x - 5.0).abs() < 1e-5);
        assert!((last.z - 5.0).abs() < 1e-5);
        assert_eq!(last.y, 0.0);
    }

    #[test]
    fn test_eases_toward_sample() {
        let grid = open_room();
        let mut filter = filter_at(1.0, 0.0, 1.0);

        // follow_speed 5.0 * dt 0.1 = half the remaining gap per tick
        filter.advance(0.1, Some(RawCoordinate::new(3.0, 1.0)), &grid);
        assert!((filter.position().x - 2.0).abs() < 1e-4);

        filter.advance(0.1, Some(RawCoordinate::new(3.0, 1.0)), &grid);
        assert!((filter.position().x - 2.5).abs() < 1e-4);
        assert!(filter.position().x < 3.0);
    }

    #[test]
    fn test_large_step_lands_without_overshoot() {
        let grid = open_room();
        let mut filter = filter_at(1.0, 0.0, 1.0);

        // follow_speed 5.0 * dt 1.0 clamps to a full step
        filter.advance(1.0, Some(RawCoordinate::new(4.0, 2.0)), &grid);

        assert!((filter.position().x - 4.0).abs() < 1e-5);
        assert!((filter.position().z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_off_surface_sample_freezes_position() {
        let config = SurfaceConfig {
            max_x: 10.0,
            max_z: 10.0,
            obstacles: vec![[4.0, 4.0, 6.0, 6.0]],
            ..SurfaceConfig::default()
        };
        let grid = FloorGrid::new(&config).unwrap();
        let mut filter = filter_at(1.0, 0.0, 1.0);

        filter.advance(0.1, Some(RawCoordinate::new(1.5, 1.0)), &grid);
        assert_eq!(filter.accepted_count(), 1);
        let held = filter.position();
        let last = filter.last_known();

        // Deep inside the obstacle: no walkable cell within radius
        filter.advance(0.1, Some(RawCoordinate::new(5.0, 5.0)), &grid);

        assert_eq!(filter.rejected_count(), 1);
        assert_eq!(filter.position(), held);
        assert_eq!(filter.last_known(), last);
    }

    #[test]
    fn test_alternating_samples_move_only_on_accept() {
        let config = SurfaceConfig {
            max_x: 10.0,
            max_z: 10.0,
            obstacles: vec![[4.0, 4.0, 6.0, 6.0]],
            ..SurfaceConfig::default()
        };
        let grid = FloorGrid::new(&config).unwrap();
        let mut filter = filter_at(1.0, 0.0, 1.0);

        let on_floor = RawCoordinate::new(2.0, 1.0);
        let in_obstacle = RawCoordinate::new(5.0, 5.0);

        filter.advance(0.1, Some(on_floor), &grid);
        let after_accept = filter.position();
        filter.advance(0.1, Some(in_obstacle), &grid);
        assert_eq!(filter.position(), after_accept);
        filter.advance(0.1, Some(on_floor), &grid);
        assert!(filter.position().x > after_accept.x);

        assert_eq!(filter.accepted_count(), 2);
        assert_eq!(filter.rejected_count(), 1);
    }

    #[test]
    fn test_height_enters_the_surface_query() {
        let grid = open_room();
        // Two meters above the floor: planar coordinates are walkable
        // but the snap distance includes the vertical gap.
        let mut filter = filter_at(2.0, 2.0, 3.0);

        filter.advance(0.1, Some(RawCoordinate::new(2.0, 3.0)), &grid);

        assert_eq!(filter.accepted_count(), 0);
        assert_eq!(filter.rejected_count(), 1);
    }

    #[test]
    fn test_set_position_is_exact() {
        let mut filter = filter_at(0.0, 0.0, 0.0);
        let target = NavPoint::new(3.25, 0.0, 4.75);
        filter.set_position(target);
        assert_eq!(filter.position(), target);
    }
}
