//! Configuration management for the try-on pipeline

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FPS_HISTORY_LENGTH, DEFAULT_FPS_SAMPLE_SIZE, DEFAULT_FPS_TARGET,
    MAX_MISSED_DETECTIONS, PROCESS_INTERVAL_MS, SMOOTHING_ALPHA,
};
use crate::metrics::MetricsTracker;
use crate::smoothing::OverlaySmoother;
use crate::{Error, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overlay smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Per-frame processing configuration
    pub processing: ProcessingConfig,

    /// Frame metrics configuration
    pub metrics: MetricsConfig,

    /// Session defaults
    pub session: SessionConfig,
}

/// Overlay smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Exponential smoothing factor (0.0-1.0]
    pub alpha: f64,

    /// Consecutive missed detections before the overlay hides
    pub max_missed_detections: u32,
}

/// Per-frame processing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Minimum milliseconds between processed video frames
    pub process_interval_ms: f64,
}

/// Frame metrics parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Maximum retained FPS samples
    pub history_length: usize,

    /// Samples considered by the rolling average
    pub sample_size: usize,
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// FPS target applied when an asset does not declare one
    pub default_fps_target: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smoothing: SmoothingConfig::default(),
            processing: ProcessingConfig::default(),
            metrics: MetricsConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: SMOOTHING_ALPHA,
            max_missed_detections: MAX_MISSED_DETECTIONS,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            process_interval_ms: PROCESS_INTERVAL_MS,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            history_length: DEFAULT_FPS_HISTORY_LENGTH,
            sample_size: DEFAULT_FPS_SAMPLE_SIZE,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_fps_target: DEFAULT_FPS_TARGET,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create an overlay smoother from configuration
    #[must_use]
    pub fn create_smoother(&self) -> OverlaySmoother {
        OverlaySmoother::new(self.smoothing.alpha, self.smoothing.max_missed_detections)
    }

    /// Create a metrics tracker from configuration
    #[must_use]
    pub fn create_metrics_tracker(&self) -> MetricsTracker {
        MetricsTracker::new(self.metrics.history_length, self.metrics.sample_size)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing.alpha > 0.0 && self.smoothing.alpha <= 1.0) {
            return Err(Error::Config(
                "Smoothing alpha must be in (0.0, 1.0]".to_string(),
            ));
        }
        if self.smoothing.max_missed_detections == 0 {
            return Err(Error::Config(
                "Missed detection limit must be greater than 0".to_string(),
            ));
        }

        if self.processing.process_interval_ms <= 0.0 {
            return Err(Error::Config(
                "Process interval must be greater than 0".to_string(),
            ));
        }

        if self.metrics.history_length == 0 {
            return Err(Error::Config(
                "Metrics history length must be greater than 0".to_string(),
            ));
        }
        if self.metrics.sample_size == 0 {
            return Err(Error::Config(
                "Metrics sample size must be greater than 0".to_string(),
            ));
        }

        if self.session.default_fps_target == 0 {
            return Err(Error::Config(
                "Default FPS target must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Try-On Pipeline Configuration

# Overlay smoothing
smoothing:
  alpha: 0.35
  max_missed_detections: 6

# Per-frame processing
processing:
  process_interval_ms: 33.0

# Frame metrics
metrics:
  history_length: 60
  sample_size: 30

# Session defaults
session:
  default_fps_target: 45
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.smoothing.alpha, SMOOTHING_ALPHA);
        assert_eq!(config.metrics.history_length, DEFAULT_FPS_HISTORY_LENGTH);
        assert_eq!(config.session.default_fps_target, DEFAULT_FPS_TARGET);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_yaml::from_str("smoothing:\n  alpha: 0.5\n  max_missed_detections: 3\n").unwrap();
        assert_eq!(config.smoothing.alpha, 0.5);
        assert_eq!(config.processing.process_interval_ms, PROCESS_INTERVAL_MS);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.smoothing.alpha = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.alpha = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.smoothing.max_missed_detections = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.processing.process_interval_ms = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.metrics.sample_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.default_fps_target = 0;
        assert!(config.validate().is_err());
    }
}
