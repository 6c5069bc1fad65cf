//! Temporal smoothing of overlay transforms.
//!
//! Raw per-frame measurements jitter with the detector. The smoother
//! blends them with an exponential moving average and rides out short
//! detection dropouts before hiding the overlay.

use std::f64::consts::PI;

use crate::constants::{MAX_MISSED_DETECTIONS, SMOOTHING_ALPHA};

/// Unsmoothed geometric placement computed for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayMeasurement {
    /// Overlay center x, pixels
    pub center_x: f64,
    /// Overlay center y, pixels
    pub center_y: f64,
    /// Overlay width, pixels
    pub width: f64,
    /// Overlay height, pixels; `None` keeps the overlay aspect-locked
    pub height: Option<f64>,
    /// Rotation around the overlay center, radians
    pub rotation_rad: f64,
}

/// Linear interpolation from `previous` toward `next` by `alpha`
#[must_use]
pub fn lerp(previous: f64, next: f64, alpha: f64) -> f64 {
    previous + (next - previous) * alpha
}

/// Angle interpolation along the shortest arc.
///
/// The raw delta is wrapped into (-PI, PI] before scaling so a transition
/// across the +/-PI boundary does not swing the long way around.
#[must_use]
pub fn blend_angle(previous: f64, next: f64, alpha: f64) -> f64 {
    let mut delta = next - previous;

    if delta > PI {
        delta -= 2.0 * PI;
    } else if delta < -PI {
        delta += 2.0 * PI;
    }

    previous + delta * alpha
}

/// Outcome of feeding one frame's result to the smoother
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayUpdate {
    /// Place the overlay at the smoothed transform
    Show(OverlayMeasurement),
    /// Nothing usable this frame; keep the current overlay as-is
    Keep,
    /// The miss limit was reached; hide the overlay
    Hide,
}

/// Exponential smoother for overlay transforms with missed-detection decay
pub struct OverlaySmoother {
    alpha: f64,
    miss_limit: u32,
    state: Option<OverlayMeasurement>,
    missed: u32,
}

impl Default for OverlaySmoother {
    fn default() -> Self {
        Self::new(SMOOTHING_ALPHA, MAX_MISSED_DETECTIONS)
    }
}

impl OverlaySmoother {
    #[must_use]
    pub fn new(alpha: f64, miss_limit: u32) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        assert!(miss_limit > 0, "Miss limit must be positive");
        Self {
            alpha,
            miss_limit,
            state: None,
            // Stale start: the first frame is a fresh acquisition and a
            // further miss keeps the overlay hidden.
            missed: miss_limit,
        }
    }

    /// Feed one frame's measurement (or a miss) and decide what the
    /// overlay should do.
    pub fn observe(&mut self, measurement: Option<&OverlayMeasurement>) -> OverlayUpdate {
        match measurement {
            Some(next) => {
                self.missed = 0;
                OverlayUpdate::Show(self.smooth(next))
            }
            None => {
                self.missed = self.missed.saturating_add(1);
                if self.missed >= self.miss_limit {
                    self.state = None;
                    OverlayUpdate::Hide
                } else {
                    OverlayUpdate::Keep
                }
            }
        }
    }

    fn smooth(&mut self, next: &OverlayMeasurement) -> OverlayMeasurement {
        let smoothed = match &self.state {
            // No history: adopt the measurement verbatim.
            None => *next,
            Some(previous) => {
                // Aspect-locked overlays carry no height; seed from the
                // incoming value when one appears mid-stream.
                let height = next
                    .height
                    .map(|h| lerp(previous.height.unwrap_or(h), h, self.alpha));

                OverlayMeasurement {
                    center_x: lerp(previous.center_x, next.center_x, self.alpha),
                    center_y: lerp(previous.center_y, next.center_y, self.alpha),
                    width: lerp(previous.width, next.width, self.alpha),
                    height,
                    rotation_rad: blend_angle(previous.rotation_rad, next.rotation_rad, self.alpha),
                }
            }
        };

        self.state = Some(smoothed);
        smoothed
    }

    /// Current smoothed transform, if the overlay is being tracked
    #[must_use]
    pub fn state(&self) -> Option<&OverlayMeasurement> {
        self.state.as_ref()
    }

    /// Consecutive misses since the last usable measurement
    #[must_use]
    pub fn missed(&self) -> u32 {
        self.missed
    }

    /// Drop the smoothed transform but keep the miss counter
    pub fn clear_state(&mut self) {
        self.state = None;
    }

    /// Mark the tracking state stale: the next usable frame starts a
    /// fresh acquisition, and a further miss keeps the overlay hidden.
    pub fn reset(&mut self) {
        self.state = None;
        self.missed = self.miss_limit;
    }
}
