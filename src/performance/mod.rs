//! # Frame Statistics
//!
//! Rolling frame-time and draw-list statistics, reported through `log` at a
//! fixed interval instead of every frame.
//!
//! ```no_run
//! use slicescope::performance::FrameStats;
//!
//! let mut stats = FrameStats::new();
//! stats.begin_frame();
//! // ... compose and render ...
//! stats.end_frame(42, 1_008);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Summary of the frames currently in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    /// Polylines in the last frame
    pub polylines: usize,
    /// Stroke vertices submitted for the last frame
    pub vertices: usize,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
            polylines: 0,
            vertices: 0,
        }
    }
}

pub struct FrameStats {
    /// Ring buffer of recent frame times for averaging
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    current_metrics: FrameMetrics,
    last_report: Instant,
    report_interval: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::with_config(120, Duration::from_secs(2))
    }

    pub fn with_config(max_samples: usize, report_interval: Duration) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            frame_start: None,
            current_metrics: FrameMetrics::default(),
            last_report: Instant::now(),
            report_interval,
        }
    }

    /// Mark the beginning of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a frame, record its draw-list size and report if due.
    pub fn end_frame(&mut self, polylines: usize, vertices: usize) {
        if let Some(start) = self.frame_start.take() {
            self.record(start.elapsed(), polylines, vertices);
        }

        if self.last_report.elapsed() >= self.report_interval {
            let m = &self.current_metrics;
            log::debug!(
                "{:.1} fps, {:.2}ms avg ({:.2}..{:.2}), {} polylines, {} vertices",
                m.fps,
                m.frame_time_ms,
                m.min_frame_time_ms,
                m.max_frame_time_ms,
                m.polylines,
                m.vertices
            );
            self.last_report = Instant::now();
        }
    }

    /// Adds one frame sample and recomputes the metrics.
    pub fn record(&mut self, frame_time: Duration, polylines: usize, vertices: usize) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);

        self.current_metrics.polylines = polylines;
        self.current_metrics.vertices = vertices;
        self.update_metrics();
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total_time: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total_time / self.frame_times.len() as u32;
        let avg_frame_time_ms = avg_frame_time.as_secs_f32() * 1000.0;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        if let (Some(min_time), Some(max_time)) =
            (self.frame_times.iter().min(), self.frame_times.iter().max())
        {
            self.current_metrics.min_frame_time_ms = min_time.as_secs_f32() * 1000.0;
            self.current_metrics.max_frame_time_ms = max_time.as_secs_f32() * 1000.0;
        }
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.current_metrics
    }

    /// Reset all metrics and history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.current_metrics = FrameMetrics::default();
        self.frame_start = None;
        self.last_report = Instant::now();
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_and_bounds() {
        let mut stats = FrameStats::new();
        stats.record(Duration::from_millis(10), 3, 18);
        stats.record(Duration::from_millis(30), 4, 24);

        let m = stats.metrics();
        assert!((m.frame_time_ms - 20.0).abs() < 1e-3);
        assert!((m.fps - 50.0).abs() < 1e-2);
        assert!((m.min_frame_time_ms - 10.0).abs() < 1e-3);
        assert!((m.max_frame_time_ms - 30.0).abs() < 1e-3);
        assert_eq!(m.polylines, 4);
        assert_eq!(m.vertices, 24);
    }

    #[test]
    fn test_window_drops_oldest_sample() {
        let mut stats = FrameStats::with_config(2, Duration::from_secs(60));
        stats.record(Duration::from_millis(100), 0, 0);
        stats.record(Duration::from_millis(10), 0, 0);
        stats.record(Duration::from_millis(10), 0, 0);
        assert!((stats.metrics().max_frame_time_ms - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut stats = FrameStats::new();
        stats.record(Duration::from_millis(16), 1, 6);
        stats.reset();
        assert_eq!(stats.metrics(), &FrameMetrics::default());
    }

    #[test]
    fn test_end_frame_without_begin_is_ignored() {
        let mut stats = FrameStats::new();
        stats.end_frame(5, 30);
        assert_eq!(stats.metrics().polylines, 0);
    }
}
