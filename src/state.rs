//! Preview session state model.
//!
//! Owned by the session adapter; hosts only ever see cloned snapshots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{LIGHTING_DIM_THRESHOLD, LIGHTING_GOOD_THRESHOLD};
use crate::Error;

/// Coarse device class the host reports for the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    Desktop,
    Mobile,
    Tablet,
}

/// Outcome of the most recent camera acquisition attempt.
///
/// `Initializing` is only re-entered by a fresh session initialization;
/// the other three are terminal per attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraStatus {
    Ready,
    PermissionDenied,
    Unavailable,
    Initializing,
}

/// Ambient lighting classification derived from frame luminance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingHint {
    Good,
    Dim,
    Unknown,
}

/// Whether the preview runs on the live camera or an uploaded photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewMode {
    Live,
    PhotoFallback,
}

impl fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewMode::Live => write!(f, "live"),
            PreviewMode::PhotoFallback => write!(f, "photo-fallback"),
        }
    }
}

impl FromStr for PreviewMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "live" => Ok(PreviewMode::Live),
            "photo-fallback" => Ok(PreviewMode::PhotoFallback),
            other => Err(Error::UnsupportedMode(other.to_string())),
        }
    }
}

/// Snapshot of everything the host UI needs to render the preview shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewState {
    pub active_asset_id: String,
    pub device_profile: DeviceProfile,
    pub camera_status: CameraStatus,
    pub lighting_hint: LightingHint,
    pub mode: PreviewMode,
    /// Instantaneous FPS samples, most recent last
    pub fps_history: Vec<f64>,
    pub last_frame_timestamp: Option<f64>,
}

impl PreviewState {
    /// State a session starts from before initialization completes
    #[must_use]
    pub fn initial() -> Self {
        Self {
            active_asset_id: "glasses".to_string(),
            device_profile: DeviceProfile::Desktop,
            camera_status: CameraStatus::Initializing,
            lighting_hint: LightingHint::Unknown,
            mode: PreviewMode::Live,
            fps_history: Vec::new(),
            last_frame_timestamp: None,
        }
    }
}

/// Classify ambient lighting from a frame's average luminance in `[0, 1]`
#[must_use]
pub fn derive_lighting_hint(average_luminance: f64) -> LightingHint {
    if average_luminance >= LIGHTING_GOOD_THRESHOLD {
        LightingHint::Good
    } else if average_luminance <= LIGHTING_DIM_THRESHOLD {
        LightingHint::Dim
    } else {
        LightingHint::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_mode_parsing() {
        assert_eq!("live".parse::<PreviewMode>().unwrap(), PreviewMode::Live);
        assert_eq!(
            "photo-fallback".parse::<PreviewMode>().unwrap(),
            PreviewMode::PhotoFallback
        );

        let error = "night-vision".parse::<PreviewMode>().unwrap_err();
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_initial_state() {
        let state = PreviewState::initial();
        assert_eq!(state.camera_status, CameraStatus::Initializing);
        assert_eq!(state.mode, PreviewMode::Live);
        assert!(state.fps_history.is_empty());
        assert!(state.last_frame_timestamp.is_none());
    }

    #[test]
    fn test_lighting_hint_thresholds() {
        assert_eq!(derive_lighting_hint(0.8), LightingHint::Good);
        assert_eq!(derive_lighting_hint(0.6), LightingHint::Good);
        assert_eq!(derive_lighting_hint(0.45), LightingHint::Unknown);
        assert_eq!(derive_lighting_hint(0.3), LightingHint::Dim);
        assert_eq!(derive_lighting_hint(0.1), LightingHint::Dim);
    }
}
