//! Guidance orchestrator - readies the pipeline and drives it per tick.
//!
//! The [`GuidanceAgent`] wires the positioning source, the navigable
//! surface, the readiness gate, the position filter, and the path
//! planner together:
//! 1. While waiting, builds the surface and polls the readiness gate
//! 2. On `Ready`, snaps the agent onto the surface once (best effort)
//! 3. In steady state, acquires one sample per tick and feeds the
//!    filter and planner
//! 4. After a gate failure, ignores ticks entirely
//!
//! Call `tick()` at the host rate with a monotonic timestamp and the
//! tick duration.

use log::{info, warn};

use crate::config::MargaConfig;
use crate::core::bridge::PositioningBridge;
use crate::core::surface::NavSurface;
use crate::core::types::{NavPath, NavPoint};
use crate::planner::PathPlanner;
use crate::readiness::{ReadinessGate, ReadinessState};
use crate::source::PositionSource;
use crate::tracking::PositionFilter;

/// Search radius for the one-shot activation snap, meters.
const ACTIVATION_SNAP_RADIUS: f32 = 1.0;

/// Tick-driven guidance pipeline.
pub struct GuidanceAgent {
    /// Position source wrapping the configured bridge
    source: PositionSource,

    /// Navigable surface the agent moves across
    surface: Box<dyn NavSurface>,

    /// Startup readiness gate
    gate: ReadinessGate,

    /// Snap-and-ease position filter
    filter: PositionFilter,

    /// Throttled path planner
    planner: PathPlanner,

    /// Current goal, if any
    target: Option<NavPoint>,

    /// Anchor map JSON, consumed by the one-shot initialization
    anchor_json: Option<String>,

    /// Whether source initialization has been attempted
    init_attempted: bool,
}

impl GuidanceAgent {
    /// Assemble the pipeline from configuration and boundary objects.
    ///
    /// `anchor_json` is the anchor map document for the positioning
    /// source; `None` leaves the source uninitialized, which a gate
    /// configured to wait for it will eventually time out on.
    pub fn new(
        config: &MargaConfig,
        bridge: Box<dyn PositioningBridge>,
        surface: Box<dyn NavSurface>,
        anchor_json: Option<String>,
    ) -> Self {
        let wait_source = config.source.driver != "null";
        let start = NavPoint::new(
            config.agent.start[0],
            config.agent.start[1],
            config.agent.start[2],
        );
        let target = config
            .agent
            .target
            .map(|t| NavPoint::new(t[0], t[1], t[2]));

        Self {
            source: PositionSource::new(bridge),
            surface,
            gate: ReadinessGate::new(&config.gate, wait_source),
            filter: PositionFilter::new(&config.tracking, start),
            planner: PathPlanner::new(&config.planner),
            target,
            anchor_json,
            init_attempted: false,
        }
    }

    /// Advance the agent by one host tick.
    ///
    /// `timestamp_us` is a monotonic microsecond clock; `dt` is the
    /// tick duration in seconds.
    pub fn tick(&mut self, timestamp_us: u64, dt: f32) {
        match self.gate.state() {
            ReadinessState::Ready => self.tick_ready(timestamp_us, dt),
            ReadinessState::Failed(_) => {}
            ReadinessState::WaitingForSurface | ReadinessState::WaitingForSource => {
                self.tick_waiting(timestamp_us)
            }
        }
    }

    /// Startup path: build the surface, initialize the source once,
    /// poll the gate, and activate on the Ready transition.
    fn tick_waiting(&mut self, timestamp_us: u64) {
        self.surface.build_if_missing();

        if !self.init_attempted {
            self.init_attempted = true;
            if let Some(json) = self.anchor_json.take() {
                if let Err(err) = self.source.initialize(&json) {
                    warn!("Positioning source failed to initialize: {}", err);
                }
            }
        }

        let state = self.gate.poll(
            timestamp_us,
            self.surface.has_data(),
            self.source.is_initialized(),
        );
        if state == ReadinessState::Ready {
            self.activate();
        }
    }

    /// One-shot placement onto the surface when the gate opens.
    ///
    /// A miss is not fatal; tracking starts from the configured
    /// position and converges once samples arrive.
    fn activate(&mut self) {
        let start = self.filter.position();
        match self.surface.sample_nearest(&start, ACTIVATION_SNAP_RADIUS) {
            Some(snapped) => {
                self.filter.set_position(snapped);
                info!(
                    "Guidance active at ({:.2}, {:.2}, {:.2})",
                    snapped.x, snapped.y, snapped.z
                );
            }
            None => {
                warn!(
                    "No navigable surface within {:.1} m of ({:.2}, {:.2}, {:.2}), starting unsnapped",
                    ACTIVATION_SNAP_RADIUS, start.x, start.y, start.z
                );
            }
        }
    }

    /// Steady state: one acquisition, then filter and planner updates.
    fn tick_ready(&mut self, timestamp_us: u64, dt: f32) {
        let sample = self.source.acquire();
        self.filter.advance(dt, sample, self.surface.as_ref());

        let position = self.filter.position();
        self.planner
            .update(timestamp_us, &position, self.target.as_ref(), self.surface.as_ref());
    }

    /// Set the goal the planner guides toward.
    pub fn set_target(&mut self, target: NavPoint) {
        info!("Target set to ({:.2}, {:.2}, {:.2})", target.x, target.y, target.z);
        self.target = Some(target);
    }

    /// Drop the goal; the path clears on the next tick.
    pub fn clear_target(&mut self) {
        if self.target.take().is_some() {
            info!("Target cleared");
        }
    }

    /// Current goal, if any.
    #[inline]
    pub fn target(&self) -> Option<NavPoint> {
        self.target
    }

    /// Readiness state of the pipeline.
    #[inline]
    pub fn state(&self) -> ReadinessState {
        self.gate.state()
    }

    /// Smoothed agent position.
    #[inline]
    pub fn position(&self) -> NavPoint {
        self.filter.position()
    }

    /// Current path from the agent to the goal.
    #[inline]
    pub fn path(&self) -> &NavPath {
        self.planner.path()
    }

    /// Position source, for diagnostics.
    #[inline]
    pub fn source(&self) -> &PositionSource {
        &self.source
    }

    /// Position filter, for diagnostics.
    #[inline]
    pub fn tracking(&self) -> &PositionFilter {
        &self.filter
    }

    /// Path planner, for diagnostics.
    #[inline]
    pub fn planner(&self) -> &PathPlanner {
        &self.planner
    }
}
