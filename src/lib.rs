//! Viewlink is the live-display bridge between a remote, asynchronous render
//! engine and an interactive local viewport.
//!
//! The engine pushes pixel buffers at an unpredictable rate; this crate turns
//! them into displayed frames at a stable rate and relays local camera
//! manipulation back without saturating the link or the CPU. Four components
//! compose into two pipelines sharing one camera pose:
//!
//! - [`decode`]: opaque payloads into canonical RGBA8 rasters
//! - [`FrameScheduler`]: at most one paint per display refresh (coalescing)
//! - [`InboundThrottle`]: caps decode+paint work during pointer drags
//! - [`CameraSync`]: rate-limited pose pushes with a guaranteed final push
//!
//! [`Viewport`] wires them together behind the host event loop's callbacks.
#![forbid(unsafe_code)]

pub mod camera;
pub mod decode;
pub mod engine;
pub mod error;
pub mod payload;
pub mod schedule;
pub mod surface;
pub mod sync;
pub mod throttle;
pub mod viewport;

pub use camera::{CameraPose, EngineCamera, MAX_RADIUS, MIN_RADIUS};
pub use decode::decode;
pub use engine::RenderEngine;
pub use error::{ViewlinkError, ViewlinkResult};
pub use payload::{
    CanonicalFrame, EncodedBytes, ImageReadyNotification, PayloadKind, PixelPayload,
};
pub use schedule::{FrameScheduler, STATUS_INTERVAL};
pub use surface::{DisplayEvents, DisplaySurface, PaintInfo, StreamStatus};
pub use sync::{CameraSync, PUSH_INTERVAL};
pub use throttle::{DRAG_FRAME_INTERVAL, InboundThrottle, IntervalGate};
pub use viewport::{DragMode, PointerUpOutcome, Viewport, ViewportConfig};
