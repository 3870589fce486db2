//! Outbound camera sync: rate-limited pose pushes with a guaranteed final
//! push on interaction end.
//!
//! The deferred push is the outbound twin of the scheduler's pending slot:
//! only the most recently requested push ever fires, and it fires with the
//! pose as it is at fire time. Lossy by intent; pointer input is far denser
//! than the link wants to carry.

use std::time::{Duration, Instant};

use crate::camera::CameraPose;
use crate::engine::RenderEngine;
use crate::throttle::IntervalGate;

/// Minimum spacing between actual pushes to the engine (10 Hz).
pub const PUSH_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub struct CameraSync {
    gate: IntervalGate,
    /// Armed deferred-push deadline; owned state, cancellable, never global.
    deferred: Option<Instant>,
}

impl CameraSync {
    /// Push now if the window is open, otherwise (re)arm the deferred push
    /// for when it reopens, replacing any previously armed one.
    pub fn push_throttled(&mut self, engine: &mut dyn RenderEngine, pose: &CameraPose, now: Instant) {
        if self.gate.ready(PUSH_INTERVAL, now) {
            self.deferred = None;
            self.push_now(engine, pose, now);
        } else {
            let last = self.gate.last_accepted().unwrap_or(now);
            self.deferred = Some(last + PUSH_INTERVAL);
        }
    }

    /// Cancel any deferred push and push unconditionally. Called on drag
    /// end so the final pose is never left stranded behind an unfired timer.
    pub fn push_immediate(&mut self, engine: &mut dyn RenderEngine, pose: &CameraPose, now: Instant) {
        self.deferred = None;
        self.push_now(engine, pose, now);
    }

    /// When the host's timer must next fire, if a deferred push is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deferred
    }

    /// The host's timer callback for the deadline from [`next_deadline`].
    /// A timer that outlived a cancellation finds nothing armed and does
    /// nothing.
    ///
    /// [`next_deadline`]: CameraSync::next_deadline
    pub fn fire_deferred(&mut self, engine: &mut dyn RenderEngine, pose: &CameraPose, now: Instant) {
        if self.deferred.take().is_some() {
            self.push_now(engine, pose, now);
        }
    }

    pub fn reset(&mut self) {
        self.gate.reset();
        self.deferred = None;
    }

    fn push_now(&mut self, engine: &mut dyn RenderEngine, pose: &CameraPose, now: Instant) {
        self.gate.mark(now);
        let (eye, target) = pose.look_at();
        // Best-effort: a failed push is logged and simply not retried; the
        // next throttled or immediate push attempts again.
        if let Err(err) = engine.set_camera(eye, target, true) {
            tracing::warn!(%err, "camera pose push failed");
            return;
        }
        if let Err(err) = engine.request_update() {
            tracing::warn!(%err, "display update request failed");
        }
    }
}
