//! Seams toward the local display: the canvas that shows frames and the
//! status-bar consumer of paint notifications.

use crate::error::ViewlinkResult;
use crate::payload::CanonicalFrame;

/// The destination canvas. Owned by the surrounding UI shell and lent to the
/// scheduler for the duration of a paint.
pub trait DisplaySurface {
    fn size(&self) -> (u32, u32);

    /// Resize the backing store. Clears the surface, so the scheduler only
    /// calls this when the frame dimensions actually changed.
    fn resize(&mut self, width: u32, height: u32);

    fn present(&mut self, frame: &CanonicalFrame) -> ViewlinkResult<()>;
}

/// Emitted once per painted frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintInfo {
    pub width: u32,
    pub height: u32,
}

/// Emitted at most every 500 ms, for the status bar. Never per-frame; a
/// per-frame status event re-renders the surrounding UI into the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamStatus {
    pub width: u32,
    pub height: u32,
    pub byte_size: usize,
    pub samples_accumulated: f32,
}

/// Consumer of paint/status notifications. Both default to no-ops so a host
/// that only wants pixels can pass `&mut ()`.
pub trait DisplayEvents {
    fn frame_painted(&mut self, _info: &PaintInfo) {}
    fn status_changed(&mut self, _status: &StreamStatus) {}
}

impl DisplayEvents for () {}
