//! Readiness gating for agent activation.
//!
//! Movement may only begin once two independent dependencies are live:
//! the walkable surface has data, and the position source reports
//! initialized. [`ReadinessGate`] waits on both in order, polled once
//! per host tick; there is no thread and no blocking wait. Each stage
//! carries an optional timeout, and a timed-out gate is terminal: the
//! agent stays inert for its lifetime.

use crate::config::GateConfig;

/// Which waiting stage timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateFailure {
    /// Surface data never appeared within the window.
    SurfaceTimeout,
    /// The position source never initialized within the window.
    SourceTimeout,
}

impl GateFailure {
    /// Human-readable description naming the failed stage.
    pub fn description(&self) -> &'static str {
        match self {
            GateFailure::SurfaceTimeout => "walkable surface data never became available",
            GateFailure::SourceTimeout => "position source never initialized",
        }
    }
}

/// Gate progression state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadinessState {
    /// Waiting for walkable-surface data.
    #[default]
    WaitingForSurface,
    /// Waiting for the position source to initialize.
    WaitingForSource,
    /// Both dependencies live; the agent may activate.
    Ready,
    /// A waiting stage timed out; the agent must not activate.
    Failed(GateFailure),
}

impl ReadinessState {
    /// Check if the gate can still advance.
    pub fn is_waiting(&self) -> bool {
        matches!(
            self,
            ReadinessState::WaitingForSurface | ReadinessState::WaitingForSource
        )
    }

    /// Convert to string for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessState::WaitingForSurface => "WAITING_FOR_SURFACE",
            ReadinessState::WaitingForSource => "WAITING_FOR_SOURCE",
            ReadinessState::Ready => "READY",
            ReadinessState::Failed(_) => "FAILED",
        }
    }
}

/// Startup barrier polled at host tick cadence.
pub struct ReadinessGate {
    config: GateConfig,
    state: ReadinessState,
    wait_source: bool,
    stage_started_us: Option<u64>,
    logged_waiting: bool,
}

impl ReadinessGate {
    /// Create a gate.
    ///
    /// `wait_source = false` skips the source stage entirely, for
    /// configurations that run without a positioning backend.
    pub fn new(config: &GateConfig, wait_source: bool) -> Self {
        Self {
            config: config.clone(),
            state: ReadinessState::default(),
            wait_source,
            stage_started_us: None,
            logged_waiting: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> ReadinessState {
        self.state
    }

    /// True once both stages passed.
    pub fn is_ready(&self) -> bool {
        self.state == ReadinessState::Ready
    }

    /// The failure, if the gate timed out.
    pub fn failure(&self) -> Option<GateFailure> {
        match self.state {
            ReadinessState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Advance the gate by one tick.
    ///
    /// A stage whose condition is already true passes within the same
    /// poll, so a fully live system reaches `Ready` on the first call.
    /// Timeouts count from stage entry; a timeout of zero waits
    /// indefinitely. Terminal states never change again.
    pub fn poll(
        &mut self,
        timestamp_us: u64,
        surface_ready: bool,
        source_initialized: bool,
    ) -> ReadinessState {
        loop {
            match self.state {
                ReadinessState::WaitingForSurface => {
                    let started = *self.stage_started_us.get_or_insert(timestamp_us);
                    if surface_ready {
                        log::info!("Walkable surface has data; readiness gate advancing");
                        self.stage_started_us = Some(timestamp_us);
                        self.logged_waiting = false;
                        if self.wait_source {
                            self.state = ReadinessState::WaitingForSource;
                            continue;
                        }
                        log::debug!("No position source configured; skipping source wait");
                        self.state = ReadinessState::Ready;
                        continue;
                    }
                    if !self.logged_waiting {
                        log::info!("Waiting for walkable surface data...");
                        self.logged_waiting = true;
                    }
                    if timed_out(started, timestamp_us, self.config.surface_timeout_secs) {
                        self.fail(GateFailure::SurfaceTimeout);
                    }
                    return self.state;
                }
                ReadinessState::WaitingForSource => {
                    let started = *self.stage_started_us.get_or_insert(timestamp_us);
                    if source_initialized {
                        log::info!("Position source initialized; readiness gate ready");
                        self.state = ReadinessState::Ready;
                        return self.state;
                    }
                    if !self.logged_waiting {
                        log::info!("Waiting for position source initialization...");
                        self.logged_waiting = true;
                    }
                    if timed_out(started, timestamp_us, self.config.source_timeout_secs) {
                        self.fail(GateFailure::SourceTimeout);
                    }
                    return self.state;
                }
                ReadinessState::Ready | ReadinessState::Failed(_) => return self.state,
            }
        }
    }

    fn fail(&mut self, failure: GateFailure) {
        log::error!("Readiness gate failed: {}", failure.description());
        self.state = ReadinessState::Failed(failure);
    }
}

fn timed_out(started_us: u64, now_us: u64, timeout_secs: f32) -> bool {
    if timeout_secs <= 0.0 {
        return false;
    }
    let elapsed = (now_us.saturating_sub(started_us)) as f32 / 1_000_000.0;
    elapsed >= timeout_secs
}
