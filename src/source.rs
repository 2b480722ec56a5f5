//! Position source: the near side of the positioning boundary.
//!
//! Wraps a [`PositioningBridge`] and turns its payloads into
//! [`RawCoordinate`] samples. All boundary failure modes degrade to
//! `None`: dropouts, sentinel "no fix" payloads, and unparseable text
//! cost one tick each, never an abort. The source owns its own
//! initialization state and one-shot diagnostic flags; there is no
//! process-wide state behind it.

use crate::core::bridge::PositioningBridge;
use crate::core::types::RawCoordinate;
use crate::error::{Error, Result};

enum PayloadIssue {
    Sentinel(&'static str),
    Parse(String),
}

/// Parse one boundary payload.
///
/// The boundary reports "no fix yet" as an empty document, an empty
/// object, or literal nulls in the coordinate fields; those are
/// expected sentinels, not errors.
fn parse_payload(payload: &str) -> std::result::Result<RawCoordinate, PayloadIssue> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(PayloadIssue::Sentinel("empty payload"));
    }
    if trimmed == "{}" {
        return Err(PayloadIssue::Sentinel("empty object payload"));
    }
    if trimmed.contains("null") {
        return Err(PayloadIssue::Sentinel("null-bearing payload"));
    }
    serde_json::from_str::<RawCoordinate>(trimmed).map_err(|e| PayloadIssue::Parse(e.to_string()))
}

/// Adapter from the positioning boundary to typed position samples.
pub struct PositionSource {
    bridge: Box<dyn PositioningBridge>,
    initialized: bool,
    warned_uninitialized: bool,
    seen_first_sample: bool,
    produced: u64,
    discarded: u64,
}

impl PositionSource {
    /// Create a source over the given bridge. The source starts
    /// uninitialized; call [`initialize`] with an anchor map first.
    ///
    /// [`initialize`]: PositionSource::initialize
    pub fn new(bridge: Box<dyn PositioningBridge>) -> Self {
        Self {
            bridge,
            initialized: false,
            warned_uninitialized: false,
            seen_first_sample: false,
            produced: 0,
            discarded: 0,
        }
    }

    /// Hand the anchor map to the boundary and start ranging.
    ///
    /// Idempotent: calling again after success warns and does nothing.
    /// A blank document or a bridge rejection leaves the source
    /// uninitialized; both are warning-grade for the caller, the
    /// pipeline keeps running without samples.
    pub fn initialize(&mut self, anchor_json: &str) -> Result<()> {
        if self.initialized {
            log::warn!("Position source already initialized; ignoring anchor map");
            return Ok(());
        }
        if anchor_json.trim().is_empty() {
            return Err(Error::AnchorMap("anchor map document is empty".to_string()));
        }
        self.bridge.set_anchor_map(anchor_json)?;
        self.bridge.start()?;
        self.initialized = true;
        log::info!("Position source '{}' initialized", self.bridge.name());
        Ok(())
    }

    /// True once the boundary accepted an anchor map and started.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Driver name of the underlying bridge.
    pub fn bridge_name(&self) -> &'static str {
        self.bridge.name()
    }

    /// Samples successfully produced so far.
    pub fn samples_produced(&self) -> u64 {
        self.produced
    }

    /// Payloads discarded as sentinel or unparseable so far.
    pub fn payloads_discarded(&self) -> u64 {
        self.discarded
    }

    /// One boundary request; `Some` only for a valid payload.
    ///
    /// The payload buffer is released when this call returns, on every
    /// path through it.
    pub fn acquire(&mut self) -> Option<RawCoordinate> {
        if !self.initialized {
            if !self.warned_uninitialized {
                log::warn!(
                    "Position source '{}' is not initialized; no samples will be produced",
                    self.bridge.name()
                );
                self.warned_uninitialized = true;
            }
            return None;
        }

        let buffer = match self.bridge.acquire_raw() {
            Some(buffer) => buffer,
            None => {
                log::trace!("Position boundary had no payload this tick");
                return None;
            }
        };

        match parse_payload(buffer.as_str()) {
            Ok(coord) => {
                self.produced += 1;
                if !self.seen_first_sample {
                    self.seen_first_sample = true;
                    log::info!(
                        "First position sample received: ({:.3}, {:.3})",
                        coord.x,
                        coord.y
                    );
                }
                Some(coord)
            }
            Err(PayloadIssue::Sentinel(reason)) => {
                self.discarded += 1;
                log::debug!("Discarding position payload: {}", reason);
                None
            }
            Err(PayloadIssue::Parse(detail)) => {
                self.discarded += 1;
                log::warn!("Unparseable position payload: {}", detail);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridges::null::NullBridge;
    use crate::core::bridge::RawBuffer;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Bridge that replays a scripted payload sequence and counts
    /// buffer releases.
    struct ScriptBridge {
        payloads: VecDeque<Option<String>>,
        released: Arc<AtomicUsize>,
    }

    impl ScriptBridge {
        fn new(payloads: &[Option<&str>]) -> (Self, Arc<AtomicUsize>) {
            let released = Arc::new(AtomicUsize::new(0));
            let bridge = Self {
                payloads: payloads
                    .iter()
                    .map(|p| p.map(|s| s.to_string()))
                    .collect(),
                released: Arc::clone(&released),
            };
            (bridge, released)
        }
    }

    impl PositioningBridge for ScriptBridge {
        fn acquire_raw(&mut self) -> Option<RawBuffer> {
            let payload = self.payloads.pop_front().flatten()?;
            let released = Arc::clone(&self.released);
            Some(RawBuffer::with_release(payload, move || {
                released.fetch_add(1, Ordering::SeqCst);
            }))
        }

        fn set_anchor_map(&mut self, _anchor_json: &str) -> crate::error::Result<()> {
            Ok(())
        }

        fn start(&mut self) -> crate::error::Result<()> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "script"
        }
    }

    const ANCHORS: &str = "{\"anchors\":[{\"id\":\"a\",\"x\":0.0,\"y\":0.0,\"z\":2.5}]}";

    fn ready_source(payloads: &[Option<&str>]) -> (PositionSource, Arc<AtomicUsize>) {
        let (bridge, released) = ScriptBridge::new(payloads);
        let mut source = PositionSource::new(Box::new(bridge));
        source.initialize(ANCHORS).unwrap();
        (source, released)
    }

    #[test]
    fn test_uninitialized_source_short_circuits() {
        let (bridge, released) = ScriptBridge::new(&[Some("{\"x\":1.0,\"y\":2.0}")]);
        let mut source = PositionSource::new(Box::new(bridge));
        assert!(source.acquire().is_none());
        assert!(source.acquire().is_none());
        // The boundary was never touched
        assert_eq!(released.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_initialize_rejects_blank_document() {
        let (bridge, _) = ScriptBridge::new(&[]);
        let mut source = PositionSource::new(Box::new(bridge));
        assert!(source.initialize("   ").is_err());
        assert!(!source.is_initialized());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (bridge, _) = ScriptBridge::new(&[]);
        let mut source = PositionSource::new(Box::new(bridge));
        assert!(source.initialize(ANCHORS).is_ok());
        assert!(source.initialize(ANCHORS).is_ok());
        assert!(source.is_initialized());
    }

    #[test]
    fn test_initialize_propagates_bridge_rejection() {
        let mut source = PositionSource::new(Box::new(NullBridge::new()));
        assert!(source.initialize(ANCHORS).is_err());
        assert!(!source.is_initialized());
        assert!(source.acquire().is_none());
    }

    #[test]
    fn test_valid_payload_produces_sample() {
        let (mut source, released) = ready_source(&[Some("{\"x\":3.0,\"y\":4.0}")]);
        let coord = source.acquire().unwrap();
        assert_eq!(coord, RawCoordinate::new(3.0, 4.0));
        assert_eq!(source.samples_produced(), 1);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_degraded_payload_releases_buffer() {
        let degraded = [
            Some(""),
            Some("{}"),
            Some("{\"x\":null,\"y\":null}"),
            Some("not-a-payload"),
        ];
        let (mut source, released) = ready_source(&degraded);
        for _ in 0..degraded.len() {
            assert!(source.acquire().is_none());
        }
        assert_eq!(source.payloads_discarded(), degraded.len() as u64);
        assert_eq!(released.load(Ordering::SeqCst), degraded.len());
    }

    #[test]
    fn test_dropout_then_recovery() {
        let (mut source, _) = ready_source(&[None, Some("{\"x\":1.5,\"y\":0.5}")]);
        assert!(source.acquire().is_none());
        let coord = source.acquire().unwrap();
        assert_eq!(coord, RawCoordinate::new(1.5, 0.5));
        assert_eq!(source.samples_produced(), 1);
        assert_eq!(source.payloads_discarded(), 0);
    }

    #[test]
    fn test_exhausted_script_behaves_as_dropout() {
        let (mut source, _) = ready_source(&[]);
        assert!(source.acquire().is_none());
    }
}
