//! Frame statistics and fps measurement

use serde::Serialize;

use super::config::Variant;

/// Snapshot of the renderer, for the overlay and the CLI report
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameStats {
    pub variant: Variant,
    pub width: f32,
    pub height: f32,
    pub points: usize,
    pub edges: usize,
    pub signals: usize,
    pub frames: u64,
    pub running: bool,
}

/// Rolling fps over the last 60 frame timestamps
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    /// Record a frame at `now_ms` milliseconds
    pub fn tick(&mut self, now_ms: f64) {
        self.frames.push(now_ms);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }

    /// Forget history, e.g. after the loop was paused
    pub fn reset(&mut self) {
        self.frames.clear();
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
