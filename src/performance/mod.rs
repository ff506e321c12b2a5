//! # Frame Timing
//!
//! Tracks the interval between animation ticks and reports the frame rate through
//! `log` at debug level.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use scrollscape::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//! let start = Instant::now();
//! for i in 0..=60 {
//!     monitor.record_frame(start + Duration::from_millis(16 * i));
//! }
//! assert!(monitor.metrics().fps > 60.0);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frame timing over the recent sample window
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
    /// Frames recorded since creation or the last reset
    pub total_frames: u64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            total_frames: 0,
        }
    }
}

/// Performance monitoring system
#[derive(Debug)]
pub struct PerformanceMonitor {
    /// Ring buffer of recent frame intervals for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum number of frame times to keep for averaging
    max_samples: usize,
    /// Time of the previous frame
    last_frame: Option<Instant>,
    /// Current performance metrics
    current_metrics: PerformanceMetrics,
    /// Last time metrics were logged
    last_report: Option<Instant>,
    /// How often metrics are logged
    report_interval: Duration,
}

impl PerformanceMonitor {
    /// Create a new performance monitor
    pub fn new() -> Self {
        Self::with_config(120, Duration::from_secs(5)) // ~2 seconds at 60fps
    }

    /// Create a new performance monitor with custom configuration
    pub fn with_config(max_samples: usize, report_interval: Duration) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_frame: None,
            current_metrics: PerformanceMetrics::default(),
            last_report: None,
            report_interval,
        }
    }

    /// Record a frame that happened at `now`
    pub fn record_frame(&mut self, now: Instant) {
        self.current_metrics.total_frames += 1;

        if let Some(last) = self.last_frame.replace(now) {
            self.add_frame_time(now.saturating_duration_since(last));
            self.update_metrics();
        }

        match self.last_report {
            None => self.last_report = Some(now),
            Some(last) if now.saturating_duration_since(last) >= self.report_interval => {
                let metrics = &self.current_metrics;
                log::debug!(
                    "{:.1} fps (avg {:.2}ms, min {:.2}ms, max {:.2}ms, {} frames)",
                    metrics.fps,
                    metrics.frame_time_ms,
                    metrics.min_frame_time_ms,
                    metrics.max_frame_time_ms,
                    metrics.total_frames
                );
                self.last_report = Some(now);
            }
            Some(_) => {}
        }
    }

    /// Add a frame time sample
    fn add_frame_time(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    /// Update calculated metrics
    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        // Calculate average frame time and FPS
        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total_time / self.frame_times.len() as u32;
        let avg_frame_time_ms = avg_frame_time.as_secs_f32() * 1000.0;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        // Calculate min/max frame times
        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    /// Get current performance metrics
    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Reset all metrics and history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.current_metrics = PerformanceMetrics::default();
        self.last_frame = None;
        self.last_report = None;
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_frame_has_no_interval() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(Instant::now());
        assert_eq!(monitor.metrics().total_frames, 1);
        assert_eq!(monitor.metrics().fps, 0.0);
    }

    #[test]
    fn test_fps_from_steady_intervals() {
        let mut monitor = PerformanceMonitor::new();
        let start = Instant::now();
        for i in 0..11 {
            monitor.record_frame(start + Duration::from_millis(20 * i));
        }
        let metrics = monitor.metrics();
        assert_relative_eq!(metrics.fps, 50.0, epsilon = 1e-3);
        assert_relative_eq!(metrics.min_frame_time_ms, 20.0, epsilon = 1e-3);
        assert_relative_eq!(metrics.max_frame_time_ms, 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_window_drops_old_samples() {
        let mut monitor = PerformanceMonitor::with_config(2, Duration::from_secs(1));
        let start = Instant::now();
        monitor.record_frame(start);
        monitor.record_frame(start + Duration::from_millis(100));
        monitor.record_frame(start + Duration::from_millis(110));
        monitor.record_frame(start + Duration::from_millis(120));
        assert_relative_eq!(monitor.metrics().max_frame_time_ms, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut monitor = PerformanceMonitor::new();
        let start = Instant::now();
        monitor.record_frame(start);
        monitor.record_frame(start + Duration::from_millis(16));
        monitor.reset();
        assert_eq!(monitor.metrics(), &PerformanceMetrics::default());
    }
}
