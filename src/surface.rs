//! Seams to the preview surface: frame sources and the overlay target.

use crate::smoothing::OverlayMeasurement;

/// A source of frames: a live video element or a static photo.
pub trait FrameSource {
    /// Whether the source currently has decodable data
    fn is_ready(&self) -> bool;

    /// Natural frame width in pixels
    fn width(&self) -> f64;

    /// Natural frame height in pixels
    fn height(&self) -> f64;

    /// Playback position in seconds. Still images report 0 and never
    /// advance, which the processor uses to skip frozen frames.
    fn position(&self) -> f64;
}

/// The render target smoothed transforms are written to.
///
/// Mirrors a DOM overlay node: absolute position and size, a centered
/// translate-and-rotate transform, and opacity toggled for show/hide.
/// Methods take `&self` like a DOM node's style object; implementations
/// use interior mutability where they need it.
pub trait OverlaySurface {
    /// Position, size, and rotate the overlay; also restores visibility
    fn apply(&self, placement: &OverlayMeasurement);

    /// Drive opacity to zero without touching the last transform
    fn hide(&self);
}

/// Overlay surface that logs placements, for headless demo runs
#[derive(Debug, Default)]
pub struct ConsoleOverlay;

impl OverlaySurface for ConsoleOverlay {
    fn apply(&self, placement: &OverlayMeasurement) {
        let height = placement
            .height
            .map_or_else(|| "auto".to_string(), |h| format!("{h:.1}"));
        log::info!(
            "overlay at ({:.1}, {:.1}) size {:.1}x{} rotation {:.3} rad",
            placement.center_x,
            placement.center_y,
            placement.width,
            height,
            placement.rotation_rad
        );
    }

    fn hide(&self) {
        log::info!("overlay hidden");
    }
}

/// A static uploaded photo used in photo-fallback mode
#[derive(Debug, Clone, Copy)]
pub struct StillImage {
    width: f64,
    height: f64,
}

impl StillImage {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl FrameSource for StillImage {
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
        0.0
    }
}
