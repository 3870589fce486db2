//! Refresh-aligned frame scheduling.
//!
//! The scheduler owns exactly one piece of cross-call state: the pending
//! slot. Payloads coalesce there until the host's refresh callback fires, so
//! a burst of arrivals costs one decode and one paint. The armed callback is
//! explicit owned state on the instance, never an ambient global, so
//! concurrent viewports do not interfere and teardown can cancel it.

use std::time::{Duration, Instant};

use crate::decode::decode;
use crate::payload::PixelPayload;
use crate::surface::{DisplayEvents, DisplaySurface, PaintInfo, StreamStatus};
use crate::throttle::IntervalGate;

/// Minimum spacing between status notifications.
pub const STATUS_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<PixelPayload>,
    armed: bool,
    torn_down: bool,
    status_gate: IntervalGate,
}

impl FrameScheduler {
    /// Store a payload for the next refresh, overwriting any payload that
    /// has not painted yet: a third frame arriving before refresh silently
    /// discards the second, never the first-in-flight.
    ///
    /// Returns `true` exactly when the host must arm its refresh-aligned
    /// callback; while one is already armed this is a no-op beyond the
    /// overwrite.
    pub fn schedule(&mut self, payload: PixelPayload) -> bool {
        if self.torn_down {
            return false;
        }
        self.pending = Some(payload);
        if self.armed {
            false
        } else {
            self.armed = true;
            true
        }
    }

    /// The host's refresh callback. An empty slot can happen when a
    /// schedule raced a cancellation; it just clears the armed flag.
    pub fn on_refresh(
        &mut self,
        surface: &mut dyn DisplaySurface,
        events: &mut dyn DisplayEvents,
        now: Instant,
    ) {
        self.armed = false;
        if self.torn_down {
            return;
        }
        if let Some(payload) = self.pending.take() {
            self.paint(payload, surface, events, now);
        }
    }

    /// Paint whatever is pending right now, without waiting for the next
    /// refresh, and cancel the armed callback. Called when the inbound
    /// throttle is about to suppress further arrivals and a final frame
    /// must still land.
    pub fn flush_pending(
        &mut self,
        surface: &mut dyn DisplaySurface,
        events: &mut dyn DisplayEvents,
        now: Instant,
    ) {
        self.armed = false;
        if self.torn_down {
            return;
        }
        if let Some(payload) = self.pending.take() {
            self.paint(payload, surface, events, now);
        }
    }

    /// Drop the slot and the status clock but keep the scheduler usable,
    /// for a transport disconnect.
    pub fn reset(&mut self) {
        self.pending = None;
        self.armed = false;
        self.status_gate.reset();
    }

    /// Permanently stop: clears the slot and cancels the armed callback.
    /// No decode runs after this.
    pub fn teardown(&mut self) {
        self.pending = None;
        self.armed = false;
        self.torn_down = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn paint(
        &mut self,
        payload: PixelPayload,
        surface: &mut dyn DisplaySurface,
        events: &mut dyn DisplayEvents,
        now: Instant,
    ) {
        let Some(frame) = decode(&payload) else {
            return;
        };
        if surface.size() != (frame.width, frame.height) {
            surface.resize(frame.width, frame.height);
        }
        if let Err(err) = surface.present(&frame) {
            tracing::warn!(%err, "paint skipped for this frame");
            return;
        }
        events.frame_painted(&PaintInfo {
            width: frame.width,
            height: frame.height,
        });
        if self.status_gate.accept(STATUS_INTERVAL, now) {
            events.status_changed(&StreamStatus {
                width: frame.width,
                height: frame.height,
                byte_size: frame.byte_len(),
                samples_accumulated: payload.samples_accumulated,
            });
        }
    }
}
