//! The remote-procedure boundary to the render engine.
//!
//! Everything behind this trait is a black box: the engine renders on its
//! own schedule and pushes image-ready notifications through the transport.
//! Calls here are treated as fire-and-forget by this crate; failures are
//! logged by the caller and never retried.

use glam::Vec3;

use crate::camera::EngineCamera;
use crate::error::ViewlinkResult;

pub trait RenderEngine {
    /// Send an eye/target pair. `suppress_echo` asks the engine not to
    /// reflect this change back as an external-update event.
    fn set_camera(&mut self, eye: Vec3, target: Vec3, suppress_echo: bool) -> ViewlinkResult<()>;

    /// Idempotent request for the engine to re-render.
    fn request_update(&mut self) -> ViewlinkResult<()>;

    /// The engine's current camera, read once at connect time.
    fn current_camera(&mut self) -> ViewlinkResult<EngineCamera>;

    /// Resolve a viewport pixel to a world-space point, if anything is hit.
    fn pick(&mut self, x: u32, y: u32) -> ViewlinkResult<Option<Vec3>>;
}
