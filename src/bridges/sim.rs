//! Simulated positioning bridge.
//!
//! Walks a fixed circuit in the source frame at a configurable speed
//! and hands out JSON payloads the way a real ranging engine would,
//! including its failure modes: dropouts (no payload), degenerate
//! payloads, and position noise. Rates and seed come from
//! [`SimConfig`], so runs are reproducible.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::bridges::noise::NoiseGenerator;
use crate::config::SimConfig;
use crate::core::bridge::{PositioningBridge, RawBuffer};
use crate::error::{Error, Result};

/// Time step ceiling so a stalled host does not teleport the walker.
const MAX_STEP_SECS: f32 = 0.25;

/// Simulated ranging engine.
pub struct SimBridge {
    config: SimConfig,
    noise: NoiseGenerator,
    position: [f32; 2],
    leg: usize,
    anchor_set: bool,
    started: bool,
    last_poll: Option<Instant>,
    live_buffers: Arc<AtomicUsize>,
}

impl SimBridge {
    /// Create a simulated bridge from configuration.
    pub fn new(config: SimConfig) -> Self {
        let noise = NoiseGenerator::new(config.random_seed);
        let position = config.circuit.first().copied().unwrap_or([0.0, 0.0]);
        let leg = if config.circuit.len() > 1 { 1 } else { 0 };
        Self {
            config,
            noise,
            position,
            leg,
            anchor_set: false,
            started: false,
            last_poll: None,
            live_buffers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Payload buffers handed out and not yet released.
    ///
    /// Steady state is zero; anything else means a caller is holding
    /// or leaking buffers.
    pub fn live_buffers(&self) -> usize {
        self.live_buffers.load(Ordering::SeqCst)
    }

    fn advance(&mut self, dt: f32) {
        if self.config.circuit.len() < 2 {
            return;
        }
        let target = self.config.circuit[self.leg];
        let dx = target[0] - self.position[0];
        let dy = target[1] - self.position[1];
        let dist = (dx * dx + dy * dy).sqrt();
        let step = self.config.speed * dt;
        if step >= dist {
            self.position = target;
            self.leg = (self.leg + 1) % self.config.circuit.len();
        } else if dist > 0.0 {
            self.position[0] += dx / dist * step;
            self.position[1] += dy / dist * step;
        }
    }

    fn make_payload(&mut self) -> String {
        if self.noise.chance(self.config.malformed_rate) {
            return match self.noise.pick(4) {
                0 => String::new(),
                1 => "{}".to_string(),
                2 => "{\"x\":null,\"y\":null}".to_string(),
                _ => "not-a-payload".to_string(),
            };
        }
        let x = self.position[0] + self.noise.gaussian(self.config.noise_stddev);
        let y = self.position[1] + self.noise.gaussian(self.config.noise_stddev);
        serde_json::json!({ "x": x, "y": y }).to_string()
    }
}

impl PositioningBridge for SimBridge {
    fn acquire_raw(&mut self) -> Option<RawBuffer> {
        if !self.started {
            return None;
        }

        let now = Instant::now();
        let dt = self
            .last_poll
            .map(|t| now.duration_since(t).as_secs_f32().min(MAX_STEP_SECS))
            .unwrap_or(0.0);
        self.last_poll = Some(now);
        self.advance(dt);

        if self.noise.chance(self.config.dropout_rate) {
            return None;
        }

        let payload = self.make_payload();
        self.live_buffers.fetch_add(1, Ordering::SeqCst);
        let live = Arc::clone(&self.live_buffers);
        Some(RawBuffer::with_release(payload, move || {
            live.fetch_sub(1, Ordering::SeqCst);
        }))
    }

    fn set_anchor_map(&mut self, anchor_json: &str) -> Result<()> {
        serde_json::from_str::<serde_json::Value>(anchor_json)
            .map_err(|e| Error::Bridge(format!("anchor map rejected: {}", e)))?;
        self.anchor_set = true;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if !self.anchor_set {
            return Err(Error::Bridge(
                "anchor map must be set before start".to_string(),
            ));
        }
        self.started = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sim"
    }
}
