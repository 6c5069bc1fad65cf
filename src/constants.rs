//! Constants used throughout the try-on pipeline

/// Exponential smoothing factor applied to overlay transforms
pub const SMOOTHING_ALPHA: f64 = 0.35;

/// Minimum interval between processed video frames (~30 FPS cadence)
pub const PROCESS_INTERVAL_MS: f64 = 33.0;

/// Consecutive missed detections before the overlay is hidden
pub const MAX_MISSED_DETECTIONS: u32 = 6;

/// Fallback FPS target when an asset does not declare one
pub const DEFAULT_FPS_TARGET: u32 = 45;

/// Maximum retained FPS samples
pub const DEFAULT_FPS_HISTORY_LENGTH: usize = 60;

/// Samples considered by the rolling FPS average
pub const DEFAULT_FPS_SAMPLE_SIZE: usize = 30;

/// Average luminance at or above which lighting counts as good
pub const LIGHTING_GOOD_THRESHOLD: f64 = 0.6;

/// Average luminance at or below which lighting counts as dim
pub const LIGHTING_DIM_THRESHOLD: f64 = 0.3;

/// Smoothing factor bounds
pub const SMOOTHING_ALPHA_MIN: f64 = 0.0;
pub const SMOOTHING_ALPHA_MAX: f64 = 1.0;
