//! Interval gating for both directions of the pipeline: inbound frame
//! acceptance during drags and outbound camera pushes share the same clock
//! shape, so it lives here once.

use std::time::{Duration, Instant};

/// Minimum spacing between frames accepted while the pointer is dragging
/// (roughly 30 Hz).
pub const DRAG_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Last-accepted timestamp for a rate limiter. All methods take `now`
/// explicitly; the owner is single-threaded and cooperative, so there is no
/// hidden clock to race against and tests stay deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalGate {
    last_accepted: Option<Instant>,
}

impl IntervalGate {
    /// Whether the interval since the last acceptance has fully elapsed.
    pub fn ready(&self, interval: Duration, now: Instant) -> bool {
        match self.last_accepted {
            Some(last) => now.saturating_duration_since(last) >= interval,
            None => true,
        }
    }

    /// Record an acceptance at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_accepted = Some(now);
    }

    /// Combined check-and-mark: true exactly when the gate was open.
    pub fn accept(&mut self, interval: Duration, now: Instant) -> bool {
        if self.ready(interval, now) {
            self.mark(now);
            true
        } else {
            false
        }
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

/// Inbound throttle: caps decode+paint work while a drag is in progress.
///
/// Coalescing in the scheduler alone still pays full decode cost for every
/// frame that gets through; this additionally reduces how often that
/// happens. Rejected payloads are dropped outright, never queued or merged.
#[derive(Debug, Default)]
pub struct InboundThrottle {
    gate: IntervalGate,
}

impl InboundThrottle {
    /// Whether a payload arriving at `now` should proceed to the scheduler.
    pub fn accept(&mut self, is_dragging: bool, now: Instant) -> bool {
        if !is_dragging {
            return true;
        }
        let accepted = self.gate.accept(DRAG_FRAME_INTERVAL, now);
        if !accepted {
            tracing::debug!("dropping frame inside drag throttle window");
        }
        accepted
    }

    pub fn reset(&mut self) {
        self.gate.reset();
    }
}
