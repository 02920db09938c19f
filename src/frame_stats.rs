//! Exports [`FrameStats`].
use std::time::{Duration, Instant};

/// How often a summary is produced.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Averages over one reporting interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSummary {
    /// Average frame time, in seconds.
    pub avg_frametime: f64,
    pub fps: f64,
    pub frames: usize,
}

/// Collects frame times and summarizes them about once a second.
#[derive(Debug)]
pub struct FrameStats {
    frametime_collector: Vec<f64>,
    last_report: Instant,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            frametime_collector: Vec::with_capacity(256),
            last_report: now,
        }
    }

    /// Record how long the last frame took.
    ///
    /// Returns a summary (and starts collecting afresh) once at least
    /// [`REPORT_INTERVAL`] has passed since the previous one.
    pub fn push(&mut self, frametime: Duration, now: Instant) -> Option<FrameSummary> {
        self.frametime_collector.push(frametime.as_secs_f64());
        if now.duration_since(self.last_report) < REPORT_INTERVAL {
            return None;
        }

        // can't reduce since we're keeping this Vec around
        let total_time: f64 = self.frametime_collector.iter().sum();
        let frames = self.frametime_collector.len();
        let avg_frametime = total_time / frames as f64;
        let summary = FrameSummary {
            avg_frametime,
            fps: if avg_frametime > 0.0 { 1.0 / avg_frametime } else { 0.0 },
            frames,
        };

        self.frametime_collector.clear();
        self.last_report = now;
        Some(summary)
    }
}
