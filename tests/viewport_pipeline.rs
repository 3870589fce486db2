//! End-to-end behavior of the display and control pipelines around one
//! viewport, driven by a scripted host loop with synthetic time.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use glam::Vec3;
use viewlink::{
    CanonicalFrame, DisplayEvents, DisplaySurface, DragMode, EncodedBytes, EngineCamera,
    ImageReadyNotification, PaintInfo, PayloadKind, PixelPayload, RenderEngine, StreamStatus,
    Viewport, ViewlinkResult, camera,
};

#[derive(Default)]
struct EngineLog {
    cameras: Vec<(Vec3, Vec3, bool)>,
    updates: usize,
}

struct FakeEngine {
    log: Rc<RefCell<EngineLog>>,
}

impl RenderEngine for FakeEngine {
    fn set_camera(&mut self, eye: Vec3, target: Vec3, suppress_echo: bool) -> ViewlinkResult<()> {
        self.log.borrow_mut().cameras.push((eye, target, suppress_echo));
        Ok(())
    }

    fn request_update(&mut self) -> ViewlinkResult<()> {
        self.log.borrow_mut().updates += 1;
        Ok(())
    }

    fn current_camera(&mut self) -> ViewlinkResult<EngineCamera> {
        Ok(EngineCamera {
            eye: Vec3::new(0.0, 0.0, 8.0),
            target: Vec3::ZERO,
            field_of_view: 0.8,
        })
    }

    fn pick(&mut self, _x: u32, _y: u32) -> ViewlinkResult<Option<Vec3>> {
        Ok(Some(Vec3::new(2.0, 0.0, -1.0)))
    }
}

#[derive(Default)]
struct FakeSurface {
    size: (u32, u32),
    painted: Vec<CanonicalFrame>,
}

impl DisplaySurface for FakeSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn present(&mut self, frame: &CanonicalFrame) -> ViewlinkResult<()> {
        self.painted.push(frame.clone());
        Ok(())
    }
}

#[derive(Default)]
struct StatusBar {
    paints: usize,
    statuses: Vec<StreamStatus>,
}

impl DisplayEvents for StatusBar {
    fn frame_painted(&mut self, _info: &PaintInfo) {
        self.paints += 1;
    }

    fn status_changed(&mut self, status: &StreamStatus) {
        self.statuses.push(*status);
    }
}

fn fixture() -> (Viewport, Rc<RefCell<EngineLog>>) {
    let log = Rc::new(RefCell::new(EngineLog::default()));
    let vp = Viewport::new(Box::new(FakeEngine {
        log: Rc::clone(&log),
    }));
    (vp, log)
}

fn payload(fill: u8) -> PixelPayload {
    PixelPayload {
        kind: PayloadKind::LowDynamicRange,
        width: 4,
        height: 4,
        row_stride: 0,
        samples_accumulated: 2.0,
        encoded: EncodedBytes::Binary(vec![fill; 64]),
    }
}

#[test]
fn coalescing_paints_only_the_newest_arrival() {
    let (mut vp, _log) = fixture();
    let mut surface = FakeSurface::default();
    let mut status = StatusBar::default();
    let now = Instant::now();

    assert!(vp.on_image_ready(ImageReadyNotification::single(payload(0xA)), now));
    assert!(!vp.on_image_ready(ImageReadyNotification::single(payload(0xB)), now));
    vp.on_refresh(&mut surface, &mut status, now);

    assert_eq!(surface.painted.len(), 1);
    assert!(surface.painted[0].data.iter().all(|&b| b == 0xB));
    assert_eq!(status.paints, 1);
}

#[test]
fn drag_throttle_bounds_paints_during_a_drag() {
    let (mut vp, _log) = fixture();
    let mut surface = FakeSurface::default();
    let start = Instant::now();

    vp.on_pointer_down(0.0, 0.0, DragMode::Orbit);
    let mut accepted = 0;
    for i in 0..=20u64 {
        let t = start + Duration::from_millis(i * 10);
        if vp.on_image_ready(ImageReadyNotification::single(payload(i as u8)), t) {
            vp.on_refresh(&mut surface, &mut (), t);
            accepted += 1;
        }
    }
    // 21 arrivals over 200 ms against a 33 ms window: at most 7 get through.
    assert!(accepted <= 7, "accepted {accepted} payloads during drag");
    assert_eq!(surface.painted.len(), accepted);
}

#[test]
fn idle_stream_paints_every_coalesced_frame() {
    let (mut vp, _log) = fixture();
    let mut surface = FakeSurface::default();
    let start = Instant::now();
    for i in 0..5u64 {
        let t = start + Duration::from_millis(i);
        assert!(vp.on_image_ready(ImageReadyNotification::single(payload(i as u8)), t));
        vp.on_refresh(&mut surface, &mut (), t);
    }
    assert_eq!(surface.painted.len(), 5);
}

#[test]
fn status_updates_are_rate_limited_across_paints() {
    let (mut vp, _log) = fixture();
    let mut surface = FakeSurface::default();
    let mut status = StatusBar::default();
    let start = Instant::now();
    for i in 0..10u64 {
        let t = start + Duration::from_millis(i * 100);
        vp.on_image_ready(ImageReadyNotification::single(payload(i as u8)), t);
        vp.on_refresh(&mut surface, &mut status, t);
    }
    assert_eq!(status.paints, 10);
    // 900 ms of paints at a 500 ms status window: 0, 500.
    assert_eq!(status.statuses.len(), 2);
    assert_eq!(status.statuses[0].width, 4);
    assert_eq!(status.statuses[0].samples_accumulated, 2.0);
}

#[test]
fn flush_lands_the_pending_frame_without_a_refresh() {
    let (mut vp, _log) = fixture();
    let mut surface = FakeSurface::default();
    let now = Instant::now();
    vp.on_image_ready(ImageReadyNotification::single(payload(0xC)), now);
    vp.flush_pending(&mut surface, &mut (), now);
    assert_eq!(surface.painted.len(), 1);
    // The armed refresh fires later and finds nothing.
    vp.on_refresh(&mut surface, &mut (), now);
    assert_eq!(surface.painted.len(), 1);
}

#[test]
fn teardown_mid_flight_stops_all_painting() {
    let (mut vp, _log) = fixture();
    let mut surface = FakeSurface::default();
    let now = Instant::now();
    assert!(vp.on_image_ready(ImageReadyNotification::single(payload(1)), now));
    vp.teardown();
    vp.on_refresh(&mut surface, &mut (), now);
    vp.flush_pending(&mut surface, &mut (), now);
    assert!(surface.painted.is_empty());
    assert!(!vp.on_image_ready(ImageReadyNotification::single(payload(2)), now));
    assert!(vp.next_push_deadline().is_none());
}

#[test]
fn full_drag_interaction_syncs_the_final_pose() {
    let (mut vp, log) = fixture();
    let start = Instant::now();

    vp.initialize_from_engine();
    assert!((vp.pose().radius - 8.0).abs() < 1e-4);

    vp.on_pointer_down(100.0, 100.0, DragMode::Orbit);
    for i in 1..=10u64 {
        vp.on_pointer_move(
            100.0 + i as f32 * 4.0,
            100.0,
            start + Duration::from_millis(i * 5),
        );
    }
    // Ten moves inside 50 ms: one immediate push, one deferred pending.
    assert_eq!(log.borrow().cameras.len(), 1);
    assert!(vp.next_push_deadline().is_some());

    vp.on_pointer_up(start + Duration::from_millis(55));
    let log = log.borrow();
    assert_eq!(log.cameras.len(), 2, "pointer-up pushes exactly once more");
    let (eye, target, suppress) = log.cameras[1];
    assert!(suppress);
    assert_eq!(target, Vec3::ZERO);
    let expected_eye = vp.pose().eye();
    assert!((eye - expected_eye).length() < 1e-4);
    assert!(vp.next_push_deadline().is_none());
    // Every push pairs the camera call with one update request.
    assert_eq!(log.updates, log.cameras.len());
}

#[test]
fn deferred_push_fires_with_the_latest_pose() {
    let (mut vp, log) = fixture();
    let start = Instant::now();
    vp.on_wheel(120.0, start);
    vp.on_wheel(120.0, start + Duration::from_millis(20));
    vp.on_wheel(120.0, start + Duration::from_millis(40));
    assert_eq!(log.borrow().cameras.len(), 1);

    let deadline = vp.next_push_deadline().expect("deferred push armed");
    assert_eq!(deadline, start + viewlink::PUSH_INTERVAL);
    vp.on_push_timer(deadline);

    let log = log.borrow();
    assert_eq!(log.cameras.len(), 2);
    let (eye, _, _) = log.cameras[1];
    assert!((eye - vp.pose().eye()).length() < 1e-4);
}

#[test]
fn pick_recenter_flows_into_the_next_push() {
    let (mut vp, log) = fixture();
    vp.pick_at(10, 10, Instant::now());
    assert_eq!(vp.pose().center, Vec3::new(2.0, 0.0, -1.0));
    let log = log.borrow();
    assert_eq!(log.cameras.len(), 1);
    assert_eq!(log.cameras[0].1, Vec3::new(2.0, 0.0, -1.0));
}

#[test]
fn radius_stays_clamped_through_extreme_wheel_input() {
    let (mut vp, _log) = fixture();
    let start = Instant::now();
    for i in 0..200u64 {
        vp.on_wheel(-1200.0, start + Duration::from_millis(i * 200));
    }
    assert!(vp.pose().radius >= camera::MIN_RADIUS);
    for i in 0..200u64 {
        vp.on_wheel(1200.0, start + Duration::from_secs(60 + i));
    }
    assert!(vp.pose().radius <= camera::MAX_RADIUS);
}

#[test]
fn notification_json_from_the_wire_decodes_and_paints() {
    use base64::Engine as _;
    let raw: Vec<u8> = (0..64).collect();
    let b64 = base64::engine::general_purpose::STANDARD.encode(&raw);
    let json = format!(
        r#"{{ "images": [{{
            "kind": "LOW_DYNAMIC_RANGE",
            "width": 4,
            "height": 4,
            "rowStride": 16,
            "samplesAccumulated": 32.0,
            "encoded": {{ "base64": "{b64}" }}
        }}] }}"#
    );
    let note: ImageReadyNotification = serde_json::from_str(&json).unwrap();

    let (mut vp, _log) = fixture();
    let mut surface = FakeSurface::default();
    let now = Instant::now();
    assert!(vp.on_image_ready(note, now));
    vp.on_refresh(&mut surface, &mut (), now);
    assert_eq!(surface.painted.len(), 1);
    assert_eq!(surface.painted[0].data, raw);
    assert_eq!(surface.size, (4, 4));
}
