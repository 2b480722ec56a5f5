//! NavSurface trait definition.

use crate::core::types::NavPoint;

/// Walkable-surface boundary.
///
/// The surface is baked elsewhere; this trait exposes only what the
/// guidance pipeline consumes: a readiness predicate, a build trigger,
/// and the two spatial queries. All coordinates in meters, navigation
/// frame (`y` up), queries over the walking plane.
pub trait NavSurface {
    /// True once walkable-surface data exists.
    fn has_data(&self) -> bool;

    /// Kick off building surface data if none exists yet.
    ///
    /// Idempotent; completion is observed through [`has_data`].
    ///
    /// [`has_data`]: NavSurface::has_data
    fn build_if_missing(&mut self);

    /// Nearest walkable point within `radius` meters of `point`.
    ///
    /// # Returns
    /// The projected point, or `None` when nothing walkable lies
    /// within the radius.
    fn sample_nearest(&self, point: &NavPoint, radius: f32) -> Option<NavPoint>;

    /// Corner path across walkable space, covering all area types.
    ///
    /// # Returns
    /// Corners from `from` to `to` inclusive, or `None` when the goal
    /// is unreachable. Must complete synchronously; it runs inside the
    /// tick loop.
    fn find_path(&self, from: &NavPoint, to: &NavPoint) -> Option<Vec<NavPoint>>;
}
