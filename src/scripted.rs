//! Deterministic scripted collaborators for demos and tests.
//!
//! These stand in for the real detection models and camera: the scripted
//! detectors replay a subject that sways gently from side to side, and
//! the scripted video advances its playback position on request. Phase is
//! derived from the frame timestamp so replays are reproducible.

use std::cell::Cell;

use crate::detectors::{
    DetectorProvider, FaceLandmarker, ImageSegmenter, PoseLandmarker, RunningMode,
    SegmentationMask,
};
use crate::landmarks::{face, pose, Landmark};
use crate::surface::FrameSource;
use crate::Result;

/// Length of the face mesh topology the scripted detector emits
pub const FACE_TOPOLOGY_LEN: usize = 478;

/// Length of the body pose topology the scripted detector emits
pub const POSE_TOPOLOGY_LEN: usize = 33;

/// Horizontal sway amplitude in normalized coordinates
const SWAY_AMPLITUDE: f64 = 0.04;

fn sway_at(timestamp_ms: f64) -> f64 {
    SWAY_AMPLITUDE * (timestamp_ms / 1000.0).sin()
}

/// Face mesh frame for a subject centered at `0.5 + sway`
#[must_use]
pub fn scripted_face_frame(sway: f64) -> Vec<Landmark> {
    let mut landmarks = vec![Landmark::new(0.5 + sway, 0.5); FACE_TOPOLOGY_LEN];
    landmarks[face::LEFT_EYE_OUTER] = Landmark::new(0.40 + sway, 0.45);
    landmarks[face::RIGHT_EYE_OUTER] = Landmark::new(0.60 + sway, 0.45);
    landmarks[face::FOREHEAD] = Landmark::new(0.50 + sway, 0.30);
    landmarks[face::CHIN] = Landmark::new(0.50 + sway, 0.72);
    landmarks[face::LEFT_CHEEK] = Landmark::new(0.36 + sway, 0.55);
    landmarks[face::RIGHT_CHEEK] = Landmark::new(0.64 + sway, 0.55);
    landmarks
}

/// Body pose frame for a subject centered at `0.5 + sway`
#[must_use]
pub fn scripted_pose_frame(sway: f64) -> Vec<Landmark> {
    let mut landmarks = vec![Landmark::new(0.5 + sway, 0.5); POSE_TOPOLOGY_LEN];
    landmarks[pose::LEFT_ANKLE] = Landmark::new(0.42 + sway, 0.82);
    landmarks[pose::RIGHT_ANKLE] = Landmark::new(0.58 + sway, 0.82);
    landmarks[pose::LEFT_FOOT_INDEX] = Landmark::new(0.40 + sway, 0.90);
    landmarks[pose::RIGHT_FOOT_INDEX] = Landmark::new(0.60 + sway, 0.90);
    landmarks
}

/// Face landmarker replaying the scripted swaying subject
#[derive(Debug)]
pub struct ScriptedFaceLandmarker {
    mode: RunningMode,
}

impl Default for ScriptedFaceLandmarker {
    fn default() -> Self {
        Self {
            mode: RunningMode::Video,
        }
    }
}

impl ScriptedFaceLandmarker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FaceLandmarker for ScriptedFaceLandmarker {
    fn set_running_mode(&mut self, mode: RunningMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn running_mode(&self) -> RunningMode {
        self.mode
    }

    fn detect_for_video(
        &mut self,
        _frame: &dyn FrameSource,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<Landmark>>> {
        Ok(Some(scripted_face_frame(sway_at(timestamp_ms))))
    }

    fn detect(&mut self, _image: &dyn FrameSource) -> Result<Option<Vec<Landmark>>> {
        Ok(Some(scripted_face_frame(0.0)))
    }
}

/// Pose landmarker replaying the scripted swaying subject
#[derive(Debug, Default)]
pub struct ScriptedPoseLandmarker;

impl PoseLandmarker for ScriptedPoseLandmarker {
    fn detect_for_video(
        &mut self,
        _frame: &dyn FrameSource,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<Landmark>>> {
        Ok(Some(scripted_pose_frame(sway_at(timestamp_ms))))
    }
}

/// Segmenter that never finds a subject; it exists so the makeup asset
/// can exercise the warm-up path headlessly.
#[derive(Debug, Default)]
pub struct ScriptedSegmenter;

impl ImageSegmenter for ScriptedSegmenter {
    fn segment_for_video(
        &mut self,
        _frame: &dyn FrameSource,
        _timestamp_ms: f64,
    ) -> Result<Option<SegmentationMask>> {
        Ok(None)
    }
}

/// Provider handing out the scripted detectors
#[derive(Debug, Default)]
pub struct ScriptedDetectorProvider;

impl ScriptedDetectorProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DetectorProvider for ScriptedDetectorProvider {
    fn face_landmarker(&mut self) -> Result<Box<dyn FaceLandmarker>> {
        Ok(Box::new(ScriptedFaceLandmarker::new()))
    }

    fn pose_landmarker(&mut self) -> Result<Box<dyn PoseLandmarker>> {
        Ok(Box::new(ScriptedPoseLandmarker))
    }

    fn image_segmenter(&mut self) -> Result<Box<dyn ImageSegmenter>> {
        Ok(Box::new(ScriptedSegmenter))
    }
}

/// Frame source whose playback position advances on request
#[derive(Debug)]
pub struct ScriptedVideo {
    width: f64,
    height: f64,
    position: Cell<f64>,
}

impl ScriptedVideo {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            position: Cell::new(0.0),
        }
    }

    /// Advance playback by `seconds`, as if the camera delivered a frame
    pub fn advance(&self, seconds: f64) {
        self.position.set(self.position.get() + seconds);
    }
}

impl FrameSource for ScriptedVideo {
    fn is_ready(&self) -> bool {
        true
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn position(&self) -> f64 {
        self.position.get()
    }
}
