//! End-to-end tests driving the session adapter and processor together


use std::cell::RefCell;
use std::rc::Rc;

use test_helpers::RecordingOverlay;
use virtual_tryon::assets::builtin_assets;
use virtual_tryon::metrics::MetricsTracker;
use virtual_tryon::processor::TryOnProcessor;
use virtual_tryon::scripted::{ScriptedDetectorProvider, ScriptedVideo};
use virtual_tryon::session::{
    InitializeSessionInput, SessionAdapter, SessionOptions, SwitchAssetInput, ToggleModeInput,
};
use virtual_tryon::state::{CameraStatus, DeviceProfile, PreviewMode};
use virtual_tryon::surface::{FrameSource, OverlaySurface, StillImage};

const FRAME_WIDTH: f64 = 1280.0;
const FRAME_HEIGHT: f64 = 720.0;

fn session_with_fixed_clock() -> SessionAdapter {
    SessionAdapter::new(SessionOptions {
        metrics: MetricsTracker::with_clock(60, 30, Box::new(|| 0.0)),
        ..SessionOptions::default()
    })
}

#[test]
fn test_glasses_session_on_mobile_end_to_end() {
    let mut session = session_with_fixed_clock();

    let response = session
        .initialize_session(&InitializeSessionInput {
            asset_id: "glasses".to_string(),
            device_profile: DeviceProfile::Mobile,
        })
        .expect("initialize should succeed");
    assert_eq!(response.fps_target, 60);

    let state = session.get_state();
    assert_eq!(state.active_asset_id, "glasses");
    assert_eq!(state.device_profile, DeviceProfile::Mobile);
    assert_eq!(state.camera_status, CameraStatus::Ready);
    assert_eq!(state.mode, PreviewMode::Live);

    // Wire the processor to a scripted camera and drive one second of
    // animation-frame ticks.
    let mut processor = TryOnProcessor::new(Box::new(ScriptedDetectorProvider::new()));
    let video = Rc::new(ScriptedVideo::new(FRAME_WIDTH, FRAME_HEIGHT));
    let overlay = RecordingOverlay::new();
    processor.attach(Rc::clone(&video) as Rc<dyn FrameSource>, Rc::clone(&overlay) as Rc<dyn OverlaySurface>);

    let glasses = builtin_assets().remove(0);
    processor.set_asset(&glasses);
    processor.set_overlay_enabled(true);

    let frame_interval_ms = 1000.0 / f64::from(response.fps_target);
    let mut timestamp = 0.0;
    for _ in 0..60 {
        video.advance(frame_interval_ms / 1000.0);
        processor.process_video_frame(timestamp);
        session.record_frame(Some(timestamp));
        timestamp += frame_interval_ms;
    }

    // The throttle halves the 60Hz tick rate to ~30 processed frames.
    let processed = overlay.apply_count();
    assert!(
        (25..=40).contains(&processed),
        "expected ~30 processed frames, got {processed}"
    );
    assert_eq!(overlay.hides.get(), 0);

    // Scripted eye corners sit 0.2 of the frame apart; the overlay width
    // settles at 2.2x that distance in pixels.
    let placement = overlay.last_applied().expect("overlay was placed");
    let eye_distance = 0.2 * FRAME_WIDTH;
    assert!(
        (placement.width - eye_distance * 2.2).abs() < 1e-6,
        "width {} off target",
        placement.width
    );
    assert!(placement.height.is_none(), "glasses are aspect-locked");
    assert!(placement.center_y > 0.0 && placement.center_y < FRAME_HEIGHT);

    // Session metrics reflect the 60Hz record cadence.
    let metrics = session.metrics_at(timestamp);
    assert!((metrics.rolling_fps - 60.0).abs() < 1.0, "fps {}", metrics.rolling_fps);
    assert!(metrics.latency_ms >= 0.0);
    assert_eq!(session.get_state().fps_history.len(), 59);
}

#[test]
fn test_switching_asset_mid_session_resets_metrics_and_tracking() {
    let mut session = session_with_fixed_clock();
    session
        .initialize_session(&InitializeSessionInput {
            asset_id: "glasses".to_string(),
            device_profile: DeviceProfile::Desktop,
        })
        .expect("initialize should succeed");

    let mut processor = TryOnProcessor::new(Box::new(ScriptedDetectorProvider::new()));
    let video = Rc::new(ScriptedVideo::new(FRAME_WIDTH, FRAME_HEIGHT));
    let overlay = RecordingOverlay::new();
    processor.attach(Rc::clone(&video) as Rc<dyn FrameSource>, Rc::clone(&overlay) as Rc<dyn OverlaySurface>);
    processor.set_asset(&builtin_assets()[0]);
    processor.set_overlay_enabled(true);

    let mut timestamp = 0.0;
    for _ in 0..10 {
        video.advance(1.0 / 30.0);
        processor.process_video_frame(timestamp);
        session.record_frame(Some(timestamp));
        timestamp += 1000.0 / 30.0;
    }
    assert!(!session.get_state().fps_history.is_empty());

    session
        .switch_asset(&SwitchAssetInput {
            asset_id: "shoes".to_string(),
        })
        .expect("switch should succeed");
    processor.set_asset(&builtin_assets()[2]);

    let state = session.get_state();
    assert_eq!(state.active_asset_id, "shoes");
    assert!(state.fps_history.is_empty(), "No cross-asset FPS carryover");
    assert_eq!(session.fps_target(), 50);
    assert!(
        processor.smoothed_state().is_none(),
        "Asset switch marks tracking stale"
    );

    // The pose pipeline takes over on the next ticks.
    let before = overlay.apply_count();
    video.advance(1.0 / 30.0);
    processor.process_video_frame(timestamp);
    assert_eq!(overlay.apply_count(), before + 1);
    let placement = overlay.last_applied().expect("overlay was placed");
    assert!(placement.height.is_some(), "shoe overlay carries a height");
}

#[test]
fn test_camera_denial_falls_back_to_photo_flow() {
    let mut session = session_with_fixed_clock();
    session
        .initialize_session(&InitializeSessionInput {
            asset_id: "glasses".to_string(),
            device_profile: DeviceProfile::Mobile,
        })
        .expect("initialize should succeed");

    let states = Rc::new(RefCell::new(Vec::new()));
    let probe = Rc::clone(&states);
    session.subscribe(move |state| probe.borrow_mut().push(state.clone()));

    // Permission failure: the host toggles mode and status together.
    session
        .toggle_mode(&ToggleModeInput {
            mode: "photo-fallback".to_string(),
            camera_status: Some(CameraStatus::PermissionDenied),
        })
        .expect("toggle should succeed");

    let last = states.borrow().last().cloned().expect("subscriber saw the toggle");
    assert_eq!(last.mode, PreviewMode::PhotoFallback);
    assert_eq!(last.camera_status, CameraStatus::PermissionDenied);

    // The processor follows the host into photo mode and measures the
    // uploaded still.
    let mut processor = TryOnProcessor::new(Box::new(ScriptedDetectorProvider::new()));
    let video = Rc::new(ScriptedVideo::new(FRAME_WIDTH, FRAME_HEIGHT));
    let overlay = RecordingOverlay::new();
    processor.attach(Rc::clone(&video) as Rc<dyn FrameSource>, Rc::clone(&overlay) as Rc<dyn OverlaySurface>);
    processor.set_asset(&builtin_assets()[0]);
    processor.set_overlay_enabled(true);
    processor.set_mode(PreviewMode::PhotoFallback);

    processor.process_image_frame(&StillImage::new(640.0, 480.0));

    let placement = overlay.last_applied().expect("photo produced a placement");
    // Scripted photo subject is centered: eyes at 0.40/0.60 of 640px.
    assert!((placement.center_x - 320.0).abs() < 1e-6);
    assert!((placement.width - 0.2 * 640.0 * 2.2).abs() < 1e-6);

    // Live ticks stay ignored while in the fallback.
    video.advance(1.0 / 30.0);
    processor.process_video_frame(1_000.0);
    assert_eq!(overlay.apply_count(), 1);
}
