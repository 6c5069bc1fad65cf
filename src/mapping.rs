//! Landmark-to-overlay geometry for each try-on asset kind.
//!
//! Each kind has its own required landmark set and measurement rules;
//! missing points or degenerate reference distances map to `None`, which
//! callers treat as a missed detection.

use serde::{Deserialize, Serialize};

use crate::landmarks::{distance, face, landmark_at, pose, to_pixels, Landmark};
use crate::smoothing::OverlayMeasurement;

/// Overlay width as a multiple of the inter-eye distance
const GLASSES_WIDTH_FACTOR: f64 = 2.2;
/// Downward center offset as a fraction of the inter-eye distance
const GLASSES_CENTER_DROP: f64 = 0.05;

/// Mask width as a multiple of the inter-cheek distance
const MAKEUP_WIDTH_FACTOR: f64 = 1.45;
/// Mask height as a multiple of the vertical face span
const MAKEUP_HEIGHT_FACTOR: f64 = 1.2;
/// Floor on the face span, as a multiple of the inter-eye distance
const MAKEUP_MIN_SPAN_EYE_FACTOR: f64 = 1.2;
/// Mask center, as a fraction of face height below the forehead
const MAKEUP_CENTER_DESCENT: f64 = 0.55;

/// Overlay width as a multiple of the inter-ankle distance
const SHOES_WIDTH_FACTOR: f64 = 2.4;
/// Overlay height as a fraction of overlay width
const SHOES_ASPECT: f64 = 0.55;
/// Upward baseline offset as a fraction of the inter-ankle distance
const SHOES_BASELINE_LIFT: f64 = 0.25;

/// The closed set of try-on asset kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Glasses,
    Makeup,
    Shoes,
}

impl AssetKind {
    /// Whether this kind tracks the face mesh (as opposed to body pose)
    #[must_use]
    pub fn uses_face_landmarks(self) -> bool {
        matches!(self, AssetKind::Glasses | AssetKind::Makeup)
    }
}

/// Map raw landmarks to an unsmoothed overlay measurement.
///
/// Returns `None` when required points are missing or the reference
/// geometry is degenerate.
#[must_use]
pub fn measure(
    kind: AssetKind,
    landmarks: &[Landmark],
    frame_width: f64,
    frame_height: f64,
) -> Option<OverlayMeasurement> {
    match kind {
        AssetKind::Glasses => glasses_measurement(landmarks, frame_width, frame_height),
        AssetKind::Makeup => makeup_measurement(landmarks, frame_width, frame_height),
        AssetKind::Shoes => shoes_measurement(landmarks, frame_width, frame_height),
    }
}

fn glasses_measurement(
    landmarks: &[Landmark],
    frame_width: f64,
    frame_height: f64,
) -> Option<OverlayMeasurement> {
    let left_eye = to_pixels(landmark_at(landmarks, face::LEFT_EYE_OUTER)?, frame_width, frame_height);
    let right_eye = to_pixels(landmark_at(landmarks, face::RIGHT_EYE_OUTER)?, frame_width, frame_height);

    let eye_distance = distance(&left_eye, &right_eye);
    if eye_distance <= 0.0 {
        return None;
    }

    Some(OverlayMeasurement {
        center_x: (left_eye.x + right_eye.x) / 2.0,
        center_y: (left_eye.y + right_eye.y) / 2.0 + eye_distance * GLASSES_CENTER_DROP,
        width: eye_distance * GLASSES_WIDTH_FACTOR,
        height: None,
        rotation_rad: (right_eye.y - left_eye.y).atan2(right_eye.x - left_eye.x),
    })
}

fn makeup_measurement(
    landmarks: &[Landmark],
    frame_width: f64,
    frame_height: f64,
) -> Option<OverlayMeasurement> {
    let left_eye = to_pixels(landmark_at(landmarks, face::LEFT_EYE_OUTER)?, frame_width, frame_height);
    let right_eye = to_pixels(landmark_at(landmarks, face::RIGHT_EYE_OUTER)?, frame_width, frame_height);

    let eye_distance = distance(&left_eye, &right_eye);
    if eye_distance <= 0.0 {
        return None;
    }

    let forehead = to_pixels(landmark_at(landmarks, face::FOREHEAD)?, frame_width, frame_height);
    let chin = to_pixels(landmark_at(landmarks, face::CHIN)?, frame_width, frame_height);
    let left_cheek = to_pixels(landmark_at(landmarks, face::LEFT_CHEEK)?, frame_width, frame_height);
    let right_cheek = to_pixels(landmark_at(landmarks, face::RIGHT_CHEEK)?, frame_width, frame_height);

    // The cheek line is more stable than the eye line for a full-face mask.
    let face_height =
        (chin.y - forehead.y).max(eye_distance * MAKEUP_MIN_SPAN_EYE_FACTOR) * MAKEUP_HEIGHT_FACTOR;

    Some(OverlayMeasurement {
        center_x: (left_cheek.x + right_cheek.x) / 2.0,
        center_y: forehead.y + face_height * MAKEUP_CENTER_DESCENT,
        width: distance(&left_cheek, &right_cheek) * MAKEUP_WIDTH_FACTOR,
        height: Some(face_height),
        rotation_rad: (right_cheek.y - left_cheek.y).atan2(right_cheek.x - left_cheek.x),
    })
}

fn shoes_measurement(
    landmarks: &[Landmark],
    frame_width: f64,
    frame_height: f64,
) -> Option<OverlayMeasurement> {
    let left_ankle = to_pixels(landmark_at(landmarks, pose::LEFT_ANKLE)?, frame_width, frame_height);
    let right_ankle = to_pixels(landmark_at(landmarks, pose::RIGHT_ANKLE)?, frame_width, frame_height);
    let left_toe = to_pixels(landmark_at(landmarks, pose::LEFT_FOOT_INDEX)?, frame_width, frame_height);
    let right_toe = to_pixels(landmark_at(landmarks, pose::RIGHT_FOOT_INDEX)?, frame_width, frame_height);

    let ankle_distance = distance(&left_ankle, &right_ankle);
    if ankle_distance <= 0.0 {
        return None;
    }

    // Anchor to whichever toe sits lower on screen.
    let foot_baseline = left_toe.y.max(right_toe.y);
    let width = ankle_distance * SHOES_WIDTH_FACTOR;

    Some(OverlayMeasurement {
        center_x: (left_ankle.x + right_ankle.x) / 2.0,
        center_y: foot_baseline - ankle_distance * SHOES_BASELINE_LIFT,
        width,
        height: Some(width * SHOES_ASPECT),
        rotation_rad: (right_toe.y - left_toe.y).atan2(right_toe.x - left_toe.x),
    })
}
