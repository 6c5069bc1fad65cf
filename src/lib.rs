//! Overlay tracking and smoothing pipeline for a real-time AR try-on
//! preview.
//!
//! Raw landmark detections (face mesh or body pose, produced by an
//! external vision capability) are mapped to a 2D overlay transform per
//! asset kind, temporally smoothed, and written to an overlay surface.
//! A session adapter coordinates asset switching, preview modes, camera
//! status, and frame metrics for a host UI.
//!
//! The per-frame pipeline consists of:
//! 1. Detection through the [`detectors`] traits (external models)
//! 2. Per-asset geometry in [`mapping`]
//! 3. Exponential smoothing with missed-detection decay in [`smoothing`]
//! 4. An overlay write through the [`surface`] seam
//!
//! # Examples
//!
//! ## Smoothing measurements
//!
//! ```
//! use virtual_tryon::smoothing::{OverlayMeasurement, OverlaySmoother, OverlayUpdate};
//!
//! let mut smoother = OverlaySmoother::default();
//! let measurement = OverlayMeasurement {
//!     center_x: 120.0,
//!     center_y: 80.0,
//!     width: 64.0,
//!     height: None,
//!     rotation_rad: 0.0,
//! };
//!
//! // The first sample is adopted verbatim.
//! match smoother.observe(Some(&measurement)) {
//!     OverlayUpdate::Show(placement) => assert_eq!(placement.width, 64.0),
//!     other => panic!("expected Show, got {other:?}"),
//! }
//! ```
//!
//! ## Driving a session
//!
//! ```
//! use virtual_tryon::session::{InitializeSessionInput, SessionAdapter};
//! use virtual_tryon::state::DeviceProfile;
//!
//! # fn main() -> virtual_tryon::Result<()> {
//! let mut session = SessionAdapter::default();
//! let response = session.initialize_session(&InitializeSessionInput {
//!     asset_id: "glasses".to_string(),
//!     device_profile: DeviceProfile::Mobile,
//! })?;
//!
//! assert_eq!(response.fps_target, 60);
//! assert_eq!(session.get_state().active_asset_id, "glasses");
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the scripted pipeline
//!
//! ```
//! use std::rc::Rc;
//!
//! use virtual_tryon::assets::builtin_assets;
//! use virtual_tryon::processor::TryOnProcessor;
//! use virtual_tryon::scripted::{ScriptedDetectorProvider, ScriptedVideo};
//! use virtual_tryon::surface::{ConsoleOverlay, FrameSource, OverlaySurface};
//!
//! let mut processor = TryOnProcessor::new(Box::new(ScriptedDetectorProvider::new()));
//! let video = Rc::new(ScriptedVideo::new(1280.0, 720.0));
//! let overlay = Rc::new(ConsoleOverlay);
//!
//! processor.attach(Rc::clone(&video) as Rc<dyn FrameSource>, overlay as Rc<dyn OverlaySurface>);
//! processor.set_asset(&builtin_assets()[0]);
//! processor.set_overlay_enabled(true);
//!
//! video.advance(1.0 / 30.0);
//! processor.process_video_frame(40.0);
//! assert!(processor.smoothed_state().is_some());
//! ```

/// Normalized landmarks and the detection models' topology contract
pub mod landmarks;

/// Per-asset landmark-to-overlay geometry
pub mod mapping;

/// Exponential smoothing of overlay transforms with missed-detection decay
pub mod smoothing;

/// Detector traits and lifecycle management
pub mod detectors;

/// Deterministic scripted detectors and frame sources
pub mod scripted;

/// Frame source and overlay surface seams
pub mod surface;

/// Try-on asset registry and artifact preloading
pub mod assets;

/// Rolling FPS and latency metrics
pub mod metrics;

/// Per-frame try-on orchestration
pub mod processor;

/// Preview session state model
pub mod state;

/// Session command surface for host UIs
pub mod session;

/// Error types and result handling
pub mod error;

/// Constants used throughout the pipeline
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
