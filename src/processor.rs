//! Per-frame try-on orchestration.
//!
//! `TryOnProcessor` owns the detector handles, routes each processed
//! frame through the active asset's mapper, feeds the smoother, and
//! writes the result to the overlay surface. A failed frame never
//! propagates out of the tick: pipeline faults are logged and treated
//! like a missed detection, while honest no-detections stay quiet.

use std::rc::Rc;

use log::{trace, warn};

use crate::assets::TryOnAsset;
use crate::constants::PROCESS_INTERVAL_MS;
use crate::detectors::{
    DetectorProvider, DetectorSlot, FaceLandmarker, ImageSegmenter, PoseLandmarker, RunningMode,
};
use crate::mapping::{self, AssetKind};
use crate::smoothing::{OverlayMeasurement, OverlaySmoother, OverlayUpdate};
use crate::state::PreviewMode;
use crate::surface::{FrameSource, OverlaySurface};

/// Per-frame overlay tracking pipeline
pub struct TryOnProcessor {
    provider: Box<dyn DetectorProvider>,

    face: DetectorSlot<dyn FaceLandmarker>,
    pose: DetectorSlot<dyn PoseLandmarker>,
    segmenter: DetectorSlot<dyn ImageSegmenter>,

    video: Option<Rc<dyn FrameSource>>,
    overlay: Option<Rc<dyn OverlaySurface>>,

    active_asset_id: Option<String>,
    active_kind: Option<AssetKind>,
    mode: PreviewMode,
    overlay_enabled: bool,

    process_interval_ms: f64,
    last_process_timestamp: f64,
    last_video_position: f64,

    smoother: OverlaySmoother,
}

impl TryOnProcessor {
    #[must_use]
    pub fn new(provider: Box<dyn DetectorProvider>) -> Self {
        Self::with_settings(provider, OverlaySmoother::default(), PROCESS_INTERVAL_MS)
    }

    /// Processor with explicit smoothing and throttle settings
    #[must_use]
    pub fn with_settings(
        provider: Box<dyn DetectorProvider>,
        smoother: OverlaySmoother,
        process_interval_ms: f64,
    ) -> Self {
        Self {
            provider,
            face: DetectorSlot::default(),
            pose: DetectorSlot::default(),
            segmenter: DetectorSlot::default(),
            video: None,
            overlay: None,
            active_asset_id: None,
            active_kind: None,
            mode: PreviewMode::Live,
            overlay_enabled: false,
            process_interval_ms,
            last_process_timestamp: f64::NEG_INFINITY,
            last_video_position: -1.0,
            smoother,
        }
    }

    /// Switch the active asset.
    ///
    /// A change of asset identity marks the tracking state stale so the
    /// next frame starts a fresh acquisition. The detectors the new asset
    /// needs are loaded lazily; a failed load is logged and retried on the
    /// next switch. For face-based assets the detector's running mode is
    /// aligned with the current preview mode.
    pub fn set_asset(&mut self, asset: &TryOnAsset) {
        if self.active_asset_id.as_deref() != Some(asset.id.as_str()) {
            self.smoother.reset();
        }

        self.active_asset_id = Some(asset.id.clone());
        self.active_kind = Some(asset.kind);

        if asset.kind.uses_face_landmarks() {
            self.ensure_face_loaded();
            self.ensure_face_mode(Self::face_mode_for(self.mode));
        }

        if asset.kind == AssetKind::Makeup {
            self.ensure_segmenter_loaded();
        }

        if asset.kind == AssetKind::Shoes {
            self.ensure_pose_loaded();
        }
    }

    /// Update the preview mode; an active face-based asset follows with a
    /// detector running-mode switch.
    pub fn set_mode(&mut self, mode: PreviewMode) {
        self.mode = mode;

        if self.active_kind.is_some_and(AssetKind::uses_face_landmarks) {
            self.ensure_face_mode(Self::face_mode_for(mode));
        }
    }

    /// Bind the live frame source and the overlay node
    pub fn attach(&mut self, video: Rc<dyn FrameSource>, overlay: Rc<dyn OverlaySurface>) {
        self.video = Some(video);
        self.overlay = Some(overlay);
    }

    /// Unbind both elements so no stale frame processing occurs
    pub fn detach(&mut self) {
        self.video = None;
        self.overlay = None;
        self.smoother.clear_state();
    }

    /// Enable or disable the overlay. Disabling hides it immediately and
    /// discards the smoothing state; enabling waits for the next
    /// successful measurement before showing anything.
    pub fn set_overlay_enabled(&mut self, enabled: bool) {
        self.overlay_enabled = enabled;
        if !enabled {
            self.hide_overlay();
        }
    }

    /// Process one animation-frame tick of live video.
    ///
    /// Skips cheaply unless the overlay is enabled, both elements are
    /// bound, an asset is active, the mode is live, the throttle interval
    /// has elapsed, and the video's playback position advanced past the
    /// last processed frame. Frames may be dropped under load but the
    /// same video position is never processed twice.
    #[allow(clippy::float_cmp)] // position equality means an unchanged frame
    pub fn process_video_frame(&mut self, timestamp_ms: f64) {
        if !self.overlay_enabled {
            return;
        }

        if self.overlay.is_none() {
            return;
        }
        let Some(video) = self.video.clone() else {
            return;
        };
        let Some(kind) = self.active_kind else {
            return;
        };

        if self.mode != PreviewMode::Live {
            return;
        }

        if timestamp_ms - self.last_process_timestamp < self.process_interval_ms {
            return;
        }

        if !video.is_ready() || video.width() <= 0.0 {
            return;
        }

        if video.position() == self.last_video_position {
            return;
        }

        self.last_process_timestamp = timestamp_ms;
        self.last_video_position = video.position();

        match kind {
            AssetKind::Glasses | AssetKind::Makeup => {
                self.process_face_frame(&*video, timestamp_ms, kind);
            }
            AssetKind::Shoes => self.process_pose_frame(&*video, timestamp_ms),
        }
    }

    /// Process a single uploaded photo in photo-fallback mode.
    ///
    /// Switches the face detector into single-image operation before
    /// detecting once. Pose detection does not operate on still photos.
    pub fn process_image_frame(&mut self, image: &dyn FrameSource) {
        if self.overlay.is_none() {
            return;
        }
        let Some(kind) = self.active_kind else {
            return;
        };

        if self.mode != PreviewMode::PhotoFallback {
            return;
        }

        match kind {
            AssetKind::Glasses | AssetKind::Makeup => {
                self.ensure_face_loaded();
                self.ensure_face_mode(RunningMode::Image);

                let Some(face) = self.face.get_mut() else {
                    return;
                };
                if face.running_mode() != RunningMode::Image {
                    return;
                }

                let measurement = match face.detect(image) {
                    Ok(Some(landmarks)) => {
                        mapping::measure(kind, &landmarks, image.width(), image.height())
                    }
                    Ok(None) => {
                        trace!("no face found in photo");
                        None
                    }
                    Err(error) => {
                        warn!("face detection failed on photo: {error}");
                        None
                    }
                };

                self.apply_measurement(measurement);
            }
            AssetKind::Shoes => {}
        }
    }

    /// Release all detector handles and clear bindings. Safe to call more
    /// than once.
    pub fn dispose(&mut self) {
        self.face.unload();
        self.pose.unload();
        self.segmenter.unload();
        self.detach();
    }

    /// Current smoothed transform, if the overlay is being tracked
    #[must_use]
    pub fn smoothed_state(&self) -> Option<&OverlayMeasurement> {
        self.smoother.state()
    }

    /// Id of the active asset
    #[must_use]
    pub fn active_asset_id(&self) -> Option<&str> {
        self.active_asset_id.as_deref()
    }

    /// Current preview mode
    #[must_use]
    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    fn face_mode_for(mode: PreviewMode) -> RunningMode {
        match mode {
            PreviewMode::Live => RunningMode::Video,
            PreviewMode::PhotoFallback => RunningMode::Image,
        }
    }

    fn ensure_face_loaded(&mut self) {
        let provider = &mut self.provider;
        if let Err(error) = self.face.ensure_with(|| provider.face_landmarker()) {
            warn!("face landmarker load failed: {error}");
        }
    }

    fn ensure_pose_loaded(&mut self) {
        let provider = &mut self.provider;
        if let Err(error) = self.pose.ensure_with(|| provider.pose_landmarker()) {
            warn!("pose landmarker load failed: {error}");
        }
    }

    fn ensure_segmenter_loaded(&mut self) {
        let provider = &mut self.provider;
        if let Err(error) = self.segmenter.ensure_with(|| provider.image_segmenter()) {
            warn!("image segmenter load failed: {error}");
        }
    }

    /// Align the face detector with the desired running mode.
    ///
    /// No-op when the detector is not loaded or already there; a failed
    /// switch is logged and leaves the previous mode in effect, so the
    /// request is simply repeated on a later frame.
    fn ensure_face_mode(&mut self, desired: RunningMode) {
        let Some(face) = self.face.get_mut() else {
            return;
        };

        if face.running_mode() == desired {
            return;
        }

        if let Err(error) = face.set_running_mode(desired) {
            warn!("face landmarker mode switch to {desired:?} failed: {error}");
        }
    }

    fn process_face_frame(&mut self, frame: &dyn FrameSource, timestamp_ms: f64, kind: AssetKind) {
        let needs_mode_switch = match self.face.get_mut() {
            None => return,
            Some(face) => face.running_mode() != RunningMode::Video,
        };

        if needs_mode_switch {
            // Wrong mode mid-stream: request the switch, drop this frame.
            self.ensure_face_mode(RunningMode::Video);
            return;
        }

        let Some(face) = self.face.get_mut() else {
            return;
        };

        let measurement = match face.detect_for_video(frame, timestamp_ms) {
            Ok(Some(landmarks)) => {
                mapping::measure(kind, &landmarks, frame.width(), frame.height())
            }
            Ok(None) => {
                trace!("no face in frame");
                None
            }
            Err(error) => {
                warn!("face detection failed: {error}");
                None
            }
        };

        self.apply_measurement(measurement);
    }

    fn process_pose_frame(&mut self, frame: &dyn FrameSource, timestamp_ms: f64) {
        let Some(pose) = self.pose.get_mut() else {
            return;
        };

        let measurement = match pose.detect_for_video(frame, timestamp_ms) {
            Ok(Some(landmarks)) => {
                mapping::measure(AssetKind::Shoes, &landmarks, frame.width(), frame.height())
            }
            Ok(None) => {
                trace!("no pose in frame");
                None
            }
            Err(error) => {
                warn!("pose detection failed: {error}");
                None
            }
        };

        self.apply_measurement(measurement);
    }

    fn apply_measurement(&mut self, measurement: Option<OverlayMeasurement>) {
        let Some(overlay) = &self.overlay else {
            return;
        };

        match self.smoother.observe(measurement.as_ref()) {
            OverlayUpdate::Show(placement) => overlay.apply(&placement),
            OverlayUpdate::Keep => {}
            OverlayUpdate::Hide => overlay.hide(),
        }
    }

    fn hide_overlay(&mut self) {
        self.smoother.clear_state();
        if let Some(overlay) = &self.overlay {
            overlay.hide();
        }
    }
}
