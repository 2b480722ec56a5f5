//! Throttled path recomputation against the navigable surface.
//!
//! Path queries are synchronous and not free, so the planner only
//! recomputes when the agent has actually gone somewhere or the last
//! result has aged out. A recomputation is triggered when ANY of these
//! hold:
//!
//! 1. No baseline yet (first update with a target)
//! 2. **Distance**: planar movement since the baseline exceeds
//!    `min_move_to_replan`
//! 3. **Time**: the refresh period (`1 / refresh_hz`) has elapsed
//!
//! Every attempt resets the baseline, successful or not. A failed
//! query keeps the previous corners on screen rather than blanking
//! the guidance, and is retried on the next trigger. Without a target
//! the path is cleared immediately, bypassing the throttle.

use log::debug;

use crate::config::PlannerConfig;
use crate::core::surface::NavSurface;
use crate::core::types::{NavPath, NavPoint};

/// Path planner with distance and time replan triggers.
#[derive(Debug)]
pub struct PathPlanner {
    /// Configuration
    config: PlannerConfig,

    /// Current corner list, replaced wholesale on success
    path: NavPath,

    /// Position and timestamp of the last recomputation attempt
    baseline: Option<(NavPoint, u64)>,

    /// Number of path queries issued
    recompute_count: u64,
}

impl PathPlanner {
    /// Create a planner with the given configuration.
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            config: config.clone(),
            path: NavPath::empty(),
            baseline: None,
            recompute_count: 0,
        }
    }

    /// Check whether a recomputation is due.
    ///
    /// Returns `true` if any of the following hold:
    /// - No attempt has been made yet
    /// - Planar movement since the baseline exceeds `min_move_to_replan`
    /// - The refresh period has elapsed since the baseline
    pub fn should_replan(&self, position: &NavPoint, timestamp_us: u64) -> bool {
        let (base_pos, base_ts) = match self.baseline {
            Some((p, t)) => (p, t),
            None => return true,
        };

        let min_move = self.config.min_move_to_replan;
        if position.planar_distance_squared(&base_pos) > min_move * min_move {
            return true;
        }

        let period_us = (1_000_000.0 / self.config.refresh_hz.max(1.0)) as u64;
        timestamp_us.saturating_sub(base_ts) >= period_us
    }

    /// Advance the planner by one tick.
    ///
    /// Recomputes the path toward `target` when a trigger fires; with
    /// no target the path is cleared right away.
    pub fn update(
        &mut self,
        timestamp_us: u64,
        position: &NavPoint,
        target: Option<&NavPoint>,
        surface: &dyn NavSurface,
    ) {
        let target = match target {
            Some(target) => target,
            None => {
                if !self.path.is_empty() {
                    self.path.clear();
                    debug!("No target set, cleared guidance path");
                }
                return;
            }
        };

        if !self.should_replan(position, timestamp_us) {
            return;
        }

        self.recompute_count += 1;
        self.baseline = Some((*position, timestamp_us));
        match surface.find_path(position, target) {
            Some(corners) => self.path.replace(corners),
            None => {
                // Keep showing the previous corners until a query succeeds
                debug!(
                    "Path query ({:.2}, {:.2}) -> ({:.2}, {:.2}) failed, keeping previous path",
                    position.x, position.z, target.x, target.z
                );
            }
        }
    }

    /// Current path from the agent position to the goal.
    #[inline]
    pub fn path(&self) -> &NavPath {
        &self.path
    }

    /// Number of path queries issued.
    #[inline]
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }
}
