//! Rendered-path consumption with change suppression.
//!
//! The consumer mirrors the planner's corner list into a polyline sink
//! at a bounded rate. Corners are lifted slightly above the walking
//! plane so the guidance line never coincides with the floor geometry,
//! and a redraw only happens when a corner moved by more than
//! `change_epsilon` or the corner count changed. Paths with fewer than
//! two corners clear the sink.

use log::debug;

use crate::config::VisualizerConfig;
use crate::core::types::{NavPath, NavPoint};

/// Boundary for whatever draws the guidance polyline.
///
/// Implementations receive the full corner list on every change and
/// own any renderer-side concerns such as camera-facing alignment.
pub trait PolylineSink {
    /// Replace the displayed polyline wholesale.
    fn set_polyline(&mut self, corners: &[NavPoint], width: f32);

    /// Remove the displayed polyline.
    fn clear(&mut self);
}

/// Throttled consumer pushing path changes into a [`PolylineSink`].
#[derive(Debug)]
pub struct PathConsumer {
    /// Configuration
    config: VisualizerConfig,

    /// Earliest timestamp at which the next update may run
    next_update_us: u64,

    /// Lifted copy of the last polyline handed to the sink
    retained: Vec<NavPoint>,
}

impl PathConsumer {
    /// Create a consumer with the given configuration.
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            config: config.clone(),
            next_update_us: 0,
            retained: Vec::new(),
        }
    }

    /// Mirror the path into the sink if the update window is open.
    ///
    /// Corners are lifted to `base_height + y_offset` before the
    /// comparison and the draw.
    pub fn update(
        &mut self,
        timestamp_us: u64,
        path: &NavPath,
        base_height: f32,
        sink: &mut dyn PolylineSink,
    ) {
        if timestamp_us < self.next_update_us {
            return;
        }
        let period_us = (1_000_000.0 / self.config.update_hz.max(1.0)) as u64;
        self.next_update_us = timestamp_us + period_us;

        if path.len() < 2 {
            if !self.retained.is_empty() {
                sink.clear();
                self.retained.clear();
            }
            return;
        }

        let height = base_height + self.config.y_offset;
        let lifted: Vec<NavPoint> = path.corners().iter().map(|c| c.with_y(height)).collect();

        if !self.changed(&lifted) {
            return;
        }

        sink.set_polyline(&lifted, self.config.line_width);
        self.retained = lifted;
    }

    /// Corner-by-corner epsilon comparison against the retained copy.
    fn changed(&self, lifted: &[NavPoint]) -> bool {
        if lifted.len() != self.retained.len() {
            return true;
        }
        let eps_sq = self.config.change_epsilon * self.config.change_epsilon;
        lifted
            .iter()
            .zip(self.retained.iter())
            .any(|(a, b)| a.distance_squared(b) > eps_sq)
    }
}

/// Sink that records everything pushed into it.
///
/// Backs headless runs and tests where no renderer exists.
#[derive(Debug, Default)]
pub struct RecordingSink {
    polylines: Vec<Vec<NavPoint>>,
    last_width: Option<f32>,
    clear_count: usize,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of polylines drawn so far.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.polylines.len()
    }

    /// Most recently drawn polyline.
    pub fn last(&self) -> Option<&[NavPoint]> {
        self.polylines.last().map(|p| p.as_slice())
    }

    /// Width passed with the most recent draw.
    #[inline]
    pub fn last_width(&self) -> Option<f32> {
        self.last_width
    }

    /// Number of times the sink was cleared.
    #[inline]
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl PolylineSink for RecordingSink {
    fn set_polyline(&mut self, corners: &[NavPoint], width: f32) {
        self.polylines.push(corners.to_vec());
        self.last_width = Some(width);
    }

    fn clear(&mut self) {
        self.clear_count += 1;
    }
}

/// Sink that logs path changes instead of drawing them.
#[derive(Debug, Default)]
pub struct LogSink;

impl PolylineSink for LogSink {
    fn set_polyline(&mut self, corners: &[NavPoint], _width: f32) {
        let length: f32 = corners.windows(2).map(|w| w[0].distance(&w[1])).sum();
        debug!("Guidance path: {} corners, {:.2} m", corners.len(), length);
    }

    fn clear(&mut self) {
        debug!("Guidance path cleared");
    }
}
