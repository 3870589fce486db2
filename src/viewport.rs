//! Composition root: one viewport instance wires the inbound display
//! pipeline and the outbound control pipeline around a shared camera pose.
//!
//! Everything here is single-threaded and cooperative. The host event loop
//! owns the timing: it arms a refresh callback when [`Viewport::on_image_ready`]
//! asks for one, and a timer for [`Viewport::next_push_deadline`]. Neither
//! callback fires after [`Viewport::teardown`].

use std::time::Instant;

use glam::Vec3;

use crate::camera::CameraPose;
use crate::engine::RenderEngine;
use crate::payload::ImageReadyNotification;
use crate::schedule::FrameScheduler;
use crate::surface::{DisplayEvents, DisplaySurface};
use crate::sync::CameraSync;
use crate::throttle::InboundThrottle;

/// What a pointer-down starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Orbit,
    Pan,
}

/// What a pointer-up amounted to. The surrounding UI reinterprets `Click`
/// (no net movement beyond threshold) as a context-menu request; that
/// disambiguation stays out of this state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerUpOutcome {
    Click,
    Drag,
}

#[derive(Clone, Copy, Debug)]
enum DragState {
    Idle,
    Dragging {
        mode: DragMode,
        last: (f32, f32),
        start: (f32, f32),
        moved: bool,
    },
}

/// Input-to-pose conversion factors.
#[derive(Clone, Copy, Debug)]
pub struct ViewportConfig {
    /// Radians of orbit per pixel of pointer travel.
    pub orbit_sensitivity: f32,
    /// World units of pan per pixel, per unit of orbit radius.
    pub pan_sensitivity: f32,
    /// Radius scale factor per wheel step of 120 delta units.
    pub zoom_step: f32,
    /// Pointer travel below this many pixels counts as a click.
    pub click_threshold: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.01,
            pan_sensitivity: 0.002,
            zoom_step: 1.1,
            click_threshold: 3.0,
        }
    }
}

pub struct Viewport {
    engine: Box<dyn RenderEngine>,
    pose: CameraPose,
    scheduler: FrameScheduler,
    inbound: InboundThrottle,
    sync: CameraSync,
    drag: DragState,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(engine: Box<dyn RenderEngine>) -> Self {
        Self::with_config(engine, ViewportConfig::default())
    }

    pub fn with_config(engine: Box<dyn RenderEngine>, config: ViewportConfig) -> Self {
        Self {
            engine,
            pose: CameraPose::default(),
            scheduler: FrameScheduler::default(),
            inbound: InboundThrottle::default(),
            sync: CameraSync::default(),
            drag: DragState::Idle,
            config,
        }
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// One-shot read of the engine's camera into the local pose. On failure
    /// the local defaults stay in place; the pose is locally authoritative
    /// from here on either way.
    pub fn initialize_from_engine(&mut self) {
        match self.engine.current_camera() {
            Ok(camera) => self.pose = CameraPose::from_engine(&camera),
            Err(err) => {
                tracing::warn!(%err, "engine camera unavailable, keeping local defaults");
            }
        }
    }

    /// Inbound notification entry point. Consumes the first payload record,
    /// throttles it during drags, and hands it to the scheduler.
    ///
    /// Returns `true` when the host must arm its refresh-aligned callback
    /// (and then call [`Viewport::on_refresh`] from it).
    pub fn on_image_ready(&mut self, notification: ImageReadyNotification, now: Instant) -> bool {
        let Some(payload) = notification.into_first() else {
            return false;
        };
        let dragging = self.is_dragging();
        if !self.inbound.accept(dragging, now) {
            return false;
        }
        self.scheduler.schedule(payload)
    }

    /// The host's refresh-aligned callback.
    pub fn on_refresh(
        &mut self,
        surface: &mut dyn DisplaySurface,
        events: &mut dyn DisplayEvents,
        now: Instant,
    ) {
        self.scheduler.on_refresh(surface, events, now);
    }

    /// Paint any pending frame immediately. Call before a stretch where
    /// arrivals will be suppressed so the last frame still lands.
    pub fn flush_pending(
        &mut self,
        surface: &mut dyn DisplaySurface,
        events: &mut dyn DisplayEvents,
        now: Instant,
    ) {
        self.scheduler.flush_pending(surface, events, now);
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32, mode: DragMode) {
        self.drag = DragState::Dragging {
            mode,
            last: (x, y),
            start: (x, y),
            moved: false,
        };
    }

    /// Mutate the pose from pointer travel, then push it throttled. Outside
    /// a drag this is a no-op.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, now: Instant) {
        let DragState::Dragging { mode, last, start, moved } = self.drag else {
            return;
        };
        let dx = x - last.0;
        let dy = y - last.1;
        match mode {
            DragMode::Orbit => {
                self.pose.orbit(
                    -dx * self.config.orbit_sensitivity,
                    -dy * self.config.orbit_sensitivity,
                );
            }
            DragMode::Pan => {
                let scale = self.pose.radius * self.config.pan_sensitivity;
                self.pose.pan(-dx * scale, dy * scale);
            }
        }
        let travel = ((x - start.0).powi(2) + (y - start.1).powi(2)).sqrt();
        self.drag = DragState::Dragging {
            mode,
            last: (x, y),
            start,
            moved: moved || travel > self.config.click_threshold,
        };
        self.sync
            .push_throttled(self.engine.as_mut(), &self.pose, now);
    }

    /// End the drag with exactly one unconditional push, so the final pose
    /// is never stranded behind an unfired deferred timer.
    pub fn on_pointer_up(&mut self, now: Instant) -> PointerUpOutcome {
        let DragState::Dragging { moved, .. } = self.drag else {
            return PointerUpOutcome::Click;
        };
        self.drag = DragState::Idle;
        self.sync
            .push_immediate(self.engine.as_mut(), &self.pose, now);
        if moved {
            PointerUpOutcome::Drag
        } else {
            PointerUpOutcome::Click
        }
    }

    /// Wheel zoom: scale the radius and push throttled. `delta` follows the
    /// usual 120-units-per-notch convention, positive away from the user.
    pub fn on_wheel(&mut self, delta: f32, now: Instant) {
        let factor = self.config.zoom_step.powf(delta / 120.0);
        self.pose.zoom_by(factor);
        self.sync
            .push_throttled(self.engine.as_mut(), &self.pose, now);
    }

    /// Ask the engine what is under a pixel and retarget the orbit there.
    /// Retargeting counts as an interaction end: the new pose pushes
    /// immediately.
    pub fn pick_at(&mut self, x: u32, y: u32, now: Instant) {
        match self.engine.pick(x, y) {
            Ok(Some(center)) => self.apply_picked_center(center, now),
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, "pick request failed"),
        }
    }

    /// The pick path that bypasses the engine round-trip, for hosts that
    /// resolve the pick themselves.
    pub fn apply_picked_center(&mut self, center: Vec3, now: Instant) {
        self.pose.set_center(center);
        self.sync
            .push_immediate(self.engine.as_mut(), &self.pose, now);
    }

    /// Deadline for the host's deferred-push timer, if one is armed.
    pub fn next_push_deadline(&self) -> Option<Instant> {
        self.sync.next_deadline()
    }

    /// The host's timer callback for [`Viewport::next_push_deadline`].
    pub fn on_push_timer(&mut self, now: Instant) {
        self.sync
            .fire_deferred(self.engine.as_mut(), &self.pose, now);
    }

    /// Transport dropped: clear both throttle clocks and the pending slot.
    /// The pose survives; it is locally authoritative.
    pub fn reset_on_disconnect(&mut self) {
        self.inbound.reset();
        self.sync.reset();
        self.scheduler.reset();
        self.drag = DragState::Idle;
    }

    /// Viewport going away: cancel the armed refresh callback and the
    /// deferred push. Nothing decodes or paints after this.
    pub fn teardown(&mut self) {
        self.scheduler.teardown();
        self.sync.reset();
        self.inbound.reset();
        self.drag = DragState::Idle;
    }
}
