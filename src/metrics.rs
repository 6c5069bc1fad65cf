//! Rolling FPS and latency metrics derived from frame timestamps.

use std::collections::VecDeque;
use std::time::Instant;

use crate::constants::{DEFAULT_FPS_HISTORY_LENGTH, DEFAULT_FPS_SAMPLE_SIZE};

/// Point-in-time metrics view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    /// Mean of the most recent FPS samples, rounded to 2 decimals
    pub rolling_fps: f64,
    /// Milliseconds since the last recorded frame, never negative
    pub latency_ms: f64,
    /// Clock reading the snapshot was taken at, milliseconds
    pub updated_at_ms: f64,
}

/// Millisecond clock the tracker samples when no timestamp is supplied
pub type Clock = Box<dyn Fn() -> f64>;

/// Rolling FPS/latency tracker fed by per-frame timestamps
pub struct MetricsTracker {
    history: VecDeque<f64>,
    last_frame_timestamp: Option<f64>,
    history_length: usize,
    sample_size: usize,
    clock: Clock,
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FPS_HISTORY_LENGTH, DEFAULT_FPS_SAMPLE_SIZE)
    }
}

impl MetricsTracker {
    /// Tracker on a monotonic clock anchored at construction
    #[must_use]
    pub fn new(history_length: usize, sample_size: usize) -> Self {
        let start = Instant::now();
        Self::with_clock(
            history_length,
            sample_size,
            Box::new(move || start.elapsed().as_secs_f64() * 1000.0),
        )
    }

    /// Tracker with an injected clock, for deterministic hosts and tests
    #[must_use]
    pub fn with_clock(history_length: usize, sample_size: usize, clock: Clock) -> Self {
        assert!(history_length > 0, "History length must be positive");
        assert!(sample_size > 0, "Sample size must be positive");
        Self {
            history: VecDeque::with_capacity(history_length),
            last_frame_timestamp: None,
            history_length,
            sample_size,
            clock,
        }
    }

    /// Record one rendered frame.
    ///
    /// The first call only establishes the baseline. Later calls append an
    /// instantaneous FPS sample (a non-positive delta records 0) and evict
    /// the oldest sample beyond the cap.
    pub fn record_frame(&mut self, timestamp: Option<f64>) {
        let current = timestamp.unwrap_or_else(|| (self.clock)());

        if let Some(last) = self.last_frame_timestamp {
            let delta = current - last;
            let fps = if delta > 0.0 { 1000.0 / delta } else { 0.0 };

            if self.history.len() >= self.history_length {
                self.history.pop_front();
            }
            self.history.push_back(round2(fps));
        }

        self.last_frame_timestamp = Some(current);
    }

    /// Clear history and baseline, as on an asset switch
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_frame_timestamp = None;
    }

    /// Snapshot against the tracker's own clock
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot_at((self.clock)())
    }

    /// Snapshot against an explicit "now", useful for replayed timelines
    #[must_use]
    pub fn snapshot_at(&self, now_ms: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            rolling_fps: self.rolling_fps(),
            latency_ms: self.latency_ms(now_ms),
            updated_at_ms: now_ms,
        }
    }

    fn rolling_fps(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }

        let considered = self.history.len().min(self.sample_size);
        let sum: f64 = self.history.iter().rev().take(considered).sum();
        round2(sum / considered as f64)
    }

    fn latency_ms(&self, now_ms: f64) -> f64 {
        match self.last_frame_timestamp {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        }
    }

    /// Retained FPS samples, oldest first
    #[must_use]
    pub fn fps_history(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    #[must_use]
    pub fn last_frame_timestamp(&self) -> Option<f64> {
        self.last_frame_timestamp
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_baseline_only() {
        let mut tracker = MetricsTracker::default();
        tracker.record_frame(Some(100.0));

        assert!(tracker.fps_history().is_empty());
        assert_eq!(tracker.last_frame_timestamp(), Some(100.0));
    }

    #[test]
    fn test_instantaneous_fps_from_delta() {
        let mut tracker = MetricsTracker::default();
        tracker.record_frame(Some(0.0));
        tracker.record_frame(Some(20.0));

        assert_eq!(tracker.fps_history(), vec![50.0]);
    }

    #[test]
    fn test_zero_delta_records_zero_sample() {
        let mut tracker = MetricsTracker::default();
        tracker.record_frame(Some(10.0));
        tracker.record_frame(Some(10.0));

        assert_eq!(tracker.fps_history(), vec![0.0]);
    }

    #[test]
    fn test_history_evicts_oldest_first() {
        let mut tracker = MetricsTracker::with_clock(3, 3, Box::new(|| 0.0));
        // Deltas 10, 10, 20, 40, 80 ms -> samples 100, 100, 50, 25, 12.5.
        for timestamp in [0.0, 10.0, 20.0, 40.0, 80.0, 160.0] {
            tracker.record_frame(Some(timestamp));
        }

        // The two oldest samples fell off the front.
        assert_eq!(tracker.fps_history(), vec![50.0, 25.0, 12.5]);
    }

    #[test]
    fn test_rolling_average_uses_recent_samples_only() {
        let mut tracker = MetricsTracker::with_clock(60, 2, Box::new(|| 0.0));
        // Deltas 100ms, 100ms, 10ms, 10ms -> samples 10, 10, 100, 100.
        for timestamp in [0.0, 100.0, 200.0, 210.0, 220.0] {
            tracker.record_frame(Some(timestamp));
        }

        // Only the last two samples count.
        assert_eq!(tracker.snapshot_at(220.0).rolling_fps, 100.0);
    }

    #[test]
    fn test_empty_snapshot_is_zero() {
        let tracker = MetricsTracker::default();
        let snapshot = tracker.snapshot_at(500.0);
        assert_eq!(snapshot.rolling_fps, 0.0);
        assert_eq!(snapshot.latency_ms, 0.0);
    }

    #[test]
    fn test_latency_never_negative() {
        let mut tracker = MetricsTracker::default();
        tracker.record_frame(Some(100.0));

        assert_eq!(tracker.snapshot_at(40.0).latency_ms, 0.0);
        assert_eq!(tracker.snapshot_at(150.0).latency_ms, 50.0);
    }

    #[test]
    fn test_reset_clears_baseline_and_history() {
        let mut tracker = MetricsTracker::default();
        tracker.record_frame(Some(0.0));
        tracker.record_frame(Some(16.0));

        tracker.reset();
        assert!(tracker.fps_history().is_empty());
        assert!(tracker.last_frame_timestamp().is_none());
        assert_eq!(tracker.snapshot_at(100.0).latency_ms, 0.0);
    }

    #[test]
    fn test_samples_round_to_two_decimals() {
        let mut tracker = MetricsTracker::default();
        tracker.record_frame(Some(0.0));
        tracker.record_frame(Some(3.0));

        // 1000 / 3 = 333.333...
        assert_eq!(tracker.fps_history(), vec![333.33]);
    }
}
