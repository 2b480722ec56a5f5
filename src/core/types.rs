//! Geometry and path types for the guidance pipeline.

use serde::{Deserialize, Serialize};

/// A planar position sample in the positioning source's native frame.
///
/// Transient: produced by one acquisition, consumed by the same tick,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawCoordinate {
    /// First source axis in meters
    pub x: f32,
    /// Second source axis in meters (navigation depth, not up)
    pub y: f32,
}

impl RawCoordinate {
    /// Create a new raw coordinate.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for RawCoordinate {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A point in the navigation frame, in meters. `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    /// X position in meters
    pub x: f32,
    /// Vertical position in meters
    pub y: f32,
    /// Z position in meters (depth)
    pub z: f32,
}

impl NavPoint {
    /// Create a new navigation point.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &NavPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &NavPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance in the walking plane (x, z), ignoring height.
    #[inline]
    pub fn planar_distance_squared(&self, other: &NavPoint) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Linear interpolation toward `other` by factor `t` in [0, 1].
    ///
    /// `t = 0` returns `self`, `t = 1` returns `other`.
    #[inline]
    pub fn lerp(&self, other: &NavPoint, t: f32) -> NavPoint {
        NavPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Copy of this point with the vertical coordinate replaced.
    #[inline]
    pub fn with_y(&self, y: f32) -> NavPoint {
        NavPoint { y, ..*self }
    }
}

impl Default for NavPoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl From<(f32, f32, f32)> for NavPoint {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

/// An ordered corner list from the agent position to the goal.
///
/// Owned by the planner; every recomputation replaces the corners
/// wholesale. Consumers read it as a borrowed snapshot and never
/// mutate corners in place.
#[derive(Debug, Clone, Default)]
pub struct NavPath {
    corners: Vec<NavPoint>,
    total_length: f32,
}

impl NavPath {
    /// Create an empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a path from a corner list.
    pub fn from_corners(corners: Vec<NavPoint>) -> Self {
        let total_length = polyline_length(&corners);
        Self {
            corners,
            total_length,
        }
    }

    /// Corners from agent position to goal.
    #[inline]
    pub fn corners(&self) -> &[NavPoint] {
        &self.corners
    }

    /// Number of corners.
    #[inline]
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    /// True when the path has no corners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Sum of segment lengths in meters.
    #[inline]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Drop all corners.
    pub fn clear(&mut self) {
        self.corners.clear();
        self.total_length = 0.0;
    }

    /// Replace the corner list wholesale.
    pub fn replace(&mut self, corners: Vec<NavPoint>) {
        self.total_length = polyline_length(&corners);
        self.corners = corners;
    }
}

fn polyline_length(corners: &[NavPoint]) -> f32 {
    corners.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_345() {
        let a = NavPoint::new(0.0, 0.0, 0.0);
        let b = NavPoint::new(3.0, 0.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
        assert!((a.distance_squared(&b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = NavPoint::new(1.0, 0.0, 1.0);
        let b = NavPoint::new(4.0, 7.5, 5.0);
        assert!((a.planar_distance_squared(&b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = NavPoint::new(0.0, 1.0, 0.0);
        let b = NavPoint::new(2.0, 1.0, 4.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.x - 1.0).abs() < 1e-6);
        assert!((mid.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_path_length_is_segment_sum() {
        let path = NavPath::from_corners(vec![
            NavPoint::new(0.0, 0.0, 0.0),
            NavPoint::new(3.0, 0.0, 4.0),
            NavPoint::new(3.0, 0.0, 14.0),
        ]);
        assert_eq!(path.len(), 3);
        assert!((path.total_length() - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_path_clear_and_replace() {
        let mut path = NavPath::from_corners(vec![
            NavPoint::new(0.0, 0.0, 0.0),
            NavPoint::new(1.0, 0.0, 0.0),
        ]);
        path.clear();
        assert!(path.is_empty());
        assert_eq!(path.total_length(), 0.0);

        path.replace(vec![
            NavPoint::new(0.0, 0.0, 0.0),
            NavPoint::new(0.0, 0.0, 2.0),
        ]);
        assert_eq!(path.len(), 2);
        assert!((path.total_length() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_corner_path_has_zero_length() {
        let path = NavPath::from_corners(vec![NavPoint::new(5.0, 0.0, 5.0)]);
        assert_eq!(path.len(), 1);
        assert_eq!(path.total_length(), 0.0);
    }
}
