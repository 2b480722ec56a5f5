//! Frame conversion between the positioning source and navigation space.
//!
//! The source reports planar coordinates where the second axis is
//! navigation depth, not up: source X maps to navigation X, source Y
//! maps to navigation Z. The vertical coordinate never comes from the
//! source; callers supply the height to preserve.

use crate::core::types::{NavPoint, RawCoordinate};

/// Map a source sample into the navigation frame at the given height.
#[inline]
pub fn to_nav(raw: RawCoordinate, height: f32) -> NavPoint {
    NavPoint::new(raw.x, height, raw.y)
}

/// Project a navigation point back into the source frame.
///
/// Drops the vertical coordinate; the planar part round-trips exactly.
#[inline]
pub fn to_source(point: &NavPoint) -> RawCoordinate {
    RawCoordinate::new(point.x, point.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_depth_axis_to_z() {
        let nav = to_nav(RawCoordinate::new(3.0, 4.0), 1.5);
        assert_eq!(nav, NavPoint::new(3.0, 1.5, 4.0));
    }

    #[test]
    fn test_height_is_caller_supplied() {
        let nav = to_nav(RawCoordinate::new(-2.0, 0.25), 0.0);
        assert_eq!(nav.y, 0.0);
        let nav = to_nav(RawCoordinate::new(-2.0, 0.25), 2.0);
        assert_eq!(nav.y, 2.0);
    }

    #[test]
    fn test_planar_round_trip() {
        let raw = RawCoordinate::new(1.25, -7.5);
        let back = to_source(&to_nav(raw, 1.8));
        assert_eq!(back, raw);
    }
}
