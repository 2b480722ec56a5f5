//! PositioningBridge trait definition and the scoped payload buffer.

use crate::error::Result;

/// Owned view of a position payload allocated on the far side of the
/// positioning boundary.
///
/// The foreign allocation is released exactly once, when the buffer
/// drops. Callers borrow the payload for the duration of one
/// acquisition and let scope exit handle the release, whichever way
/// the scope exits (success, parse failure, early return).
pub struct RawBuffer {
    payload: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl RawBuffer {
    /// Wrap a payload with no release obligation.
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            release: None,
        }
    }

    /// Wrap a payload whose backing allocation must be released.
    ///
    /// `release` runs exactly once, on drop.
    pub fn with_release(payload: impl Into<String>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            payload: payload.into(),
            release: Some(Box::new(release)),
        }
    }

    /// Borrow the payload text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.payload
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for RawBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBuffer")
            .field("payload", &self.payload)
            .field("owned", &self.release.is_some())
            .finish()
    }
}

/// Positioning boundary trait.
///
/// Models an opaque ranging engine reached across a foreign-memory
/// boundary: anchor layout goes in once, then each `acquire_raw` call
/// requests one position payload. Implementations decide nothing about
/// navigation; they only move payloads across the seam.
pub trait PositioningBridge: Send {
    /// Request one position payload.
    ///
    /// `None` means the boundary had no sample to hand over this tick
    /// (dropout). Payload validation is the caller's concern.
    fn acquire_raw(&mut self) -> Option<RawBuffer>;

    /// Hand the anchor layout to the boundary. Must precede [`start`].
    ///
    /// [`start`]: PositioningBridge::start
    fn set_anchor_map(&mut self, anchor_json: &str) -> Result<()>;

    /// Begin ranging.
    fn start(&mut self) -> Result<()>;

    /// Driver name for logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_release_runs_once_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&released);
        {
            let buffer = RawBuffer::with_release("{\"x\":1.0,\"y\":2.0}", move || {
                r.fetch_add(1, Ordering::SeqCst);
            });
            assert_eq!(buffer.as_str(), "{\"x\":1.0,\"y\":2.0}");
            assert_eq!(released.load(Ordering::SeqCst), 0);
        }
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_runs_on_early_exit() {
        fn parse_or_bail(buffer: RawBuffer) -> Option<f32> {
            // Simulated parse failure path: returns before using the value
            if buffer.as_str().contains("null") {
                return None;
            }
            Some(0.0)
        }

        let released = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&released);
        let buffer = RawBuffer::with_release("{\"x\":null}", move || {
            r.fetch_add(1, Ordering::SeqCst);
        });
        assert!(parse_or_bail(buffer).is_none());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unowned_buffer_drops_cleanly() {
        let buffer = RawBuffer::new("{}");
        assert_eq!(buffer.as_str(), "{}");
    }
}
