//! Shared fixtures for the pipeline tests.
//!
//! `ScriptBridge` replays a pre-recorded frame sequence through the
//! positioning boundary. Every payload it hands out carries a release
//! hook wired to a shared counter, so tests can prove at the end of a
//! run that no buffer outlived its acquisition.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use marga_nav::config::MargaConfig;
use marga_nav::core::bridge::{PositioningBridge, RawBuffer};
use marga_nav::error::Result;

/// Anchor map document shared by the pipeline tests.
pub const ANCHORS: &str = r#"{"anchors":[
    {"id":"A0","x":0.0,"y":2.4,"z":0.0},
    {"id":"A1","x":8.0,"y":2.4,"z":0.0},
    {"id":"A2","x":8.0,"y":2.4,"z":6.0},
    {"id":"A3","x":0.0,"y":2.4,"z":6.0}
]}"#;

/// Positioning bridge that replays a fixed frame script.
///
/// `None` entries are dropouts. String entries are returned verbatim
/// as payloads, well-formed or not. An exhausted script behaves like a
/// boundary that stopped producing: every further acquisition is a
/// dropout.
pub struct ScriptBridge {
    frames: VecDeque<Option<String>>,
    anchor_set: bool,
    started: bool,
    live_buffers: Arc<AtomicUsize>,
}

impl ScriptBridge {
    pub fn new(frames: Vec<Option<String>>) -> Self {
        Self {
            frames: frames.into(),
            anchor_set: false,
            started: false,
            live_buffers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle to the count of acquired-but-unreleased payload buffers.
    ///
    /// Clone this before handing the bridge to an agent; it must read
    /// zero once every acquisition scope has closed.
    pub fn live_buffers(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_buffers)
    }
}

impl PositioningBridge for ScriptBridge {
    fn acquire_raw(&mut self) -> Option<RawBuffer> {
        if !self.started {
            return None;
        }
        match self.frames.pop_front() {
            Some(Some(payload)) => {
                self.live_buffers.fetch_add(1, Ordering::SeqCst);
                let live = Arc::clone(&self.live_buffers);
                Some(RawBuffer::with_release(payload, move || {
                    live.fetch_sub(1, Ordering::SeqCst);
                }))
            }
            _ => None,
        }
    }

    fn set_anchor_map(&mut self, _anchor_json: &str) -> Result<()> {
        self.anchor_set = true;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "script"
    }
}

/// One well-formed coordinate frame.
pub fn frame(x: f32, y: f32) -> Option<String> {
    Some(format!(r#"{{"x":{:.4},"y":{:.4}}}"#, x, y))
}

/// Frames walking the x axis at a fixed depth, `step` metres apart,
/// endpoints included.
pub fn walk_x(from: f32, to: f32, step: f32, depth: f32) -> Vec<Option<String>> {
    let count = ((to - from) / step).round() as usize;
    (0..=count)
        .map(|i| frame(from + i as f32 * step, depth))
        .collect()
}

/// The same frame repeated, for letting the easing filter settle.
pub fn hold(x: f32, y: f32, ticks: usize) -> Vec<Option<String>> {
    (0..ticks).map(|_| frame(x, y)).collect()
}

/// Configuration for an empty 8 m by 6 m room with a scripted source.
///
/// The surface is available from the first tick and both gate stages
/// are generously timed; tests tighten individual knobs as needed.
pub fn room_config() -> MargaConfig {
    let mut config = MargaConfig::default();
    config.source.driver = "script".to_string();
    config.gate.surface_timeout_secs = 5.0;
    config.gate.source_timeout_secs = 5.0;
    config
}
