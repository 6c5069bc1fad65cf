//! Detector seams and lifecycle.
//!
//! The detection models are external collaborators: hosts wire in
//! implementations (MediaPipe, ONNX, scripted fakes) behind these traits
//! and the processor only manages their lifecycle. `Ok(None)` from a
//! detect call means no subject was found; `Err` means the pipeline
//! itself failed.

use crate::landmarks::Landmark;
use crate::surface::FrameSource;
use crate::{Error, Result};

/// Operating mode of a detector that supports both streams and stills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningMode {
    /// Streaming video detection
    Video,
    /// Single-image detection
    Image,
}

/// Face landmark detection capability
pub trait FaceLandmarker {
    /// Switch between streaming and single-image operation.
    ///
    /// A failed switch must leave the previous mode in effect.
    fn set_running_mode(&mut self, mode: RunningMode) -> Result<()>;

    /// Mode the detector currently operates in
    fn running_mode(&self) -> RunningMode;

    /// Detect face landmarks on a streaming frame
    fn detect_for_video(
        &mut self,
        frame: &dyn FrameSource,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<Landmark>>>;

    /// Detect face landmarks on a single still image
    fn detect(&mut self, image: &dyn FrameSource) -> Result<Option<Vec<Landmark>>>;
}

/// Body pose landmark detection capability
pub trait PoseLandmarker {
    /// Detect pose landmarks on a streaming frame
    fn detect_for_video(
        &mut self,
        frame: &dyn FrameSource,
        timestamp_ms: f64,
    ) -> Result<Option<Vec<Landmark>>>;
}

/// Category mask produced by a segmenter
#[derive(Debug, Clone)]
pub struct SegmentationMask {
    pub width: u32,
    pub height: u32,
    /// Row-major category index per pixel
    pub categories: Vec<u8>,
}

/// Person segmentation capability, warmed alongside the makeup overlay
pub trait ImageSegmenter {
    /// Produce a category mask for the frame
    fn segment_for_video(
        &mut self,
        frame: &dyn FrameSource,
        timestamp_ms: f64,
    ) -> Result<Option<SegmentationMask>>;
}

/// Factory the processor pulls detector instances from, lazily
pub trait DetectorProvider {
    fn face_landmarker(&mut self) -> Result<Box<dyn FaceLandmarker>>;
    fn pose_landmarker(&mut self) -> Result<Box<dyn PoseLandmarker>>;
    fn image_segmenter(&mut self) -> Result<Box<dyn ImageSegmenter>>;
}

/// Lazily created, memoized detector handle.
///
/// A load is attempted when the slot is first needed and the instance is
/// reused across frames and asset switches. A failed load leaves the slot
/// unloaded so a later request can retry; `unload` releases the instance.
pub struct DetectorSlot<T: ?Sized>(Option<Box<T>>);

impl<T: ?Sized> Default for DetectorSlot<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: ?Sized> DetectorSlot<T> {
    /// Return the detector, loading it through `load` if necessary
    pub fn ensure_with<F>(&mut self, load: F) -> Result<&mut T>
    where
        F: FnOnce() -> Result<Box<T>>,
    {
        if self.0.is_none() {
            self.0 = Some(load()?);
        }

        self.0
            .as_deref_mut()
            .ok_or_else(|| Error::DetectorLoad("detector slot empty after load".to_string()))
    }

    /// Return the detector if it is already loaded
    #[must_use]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_deref_mut()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.0.is_some()
    }

    /// Release the instance; the next request loads a fresh one
    pub fn unload(&mut self) {
        self.0 = None;
    }
}
