//! Per-frame draw statistics and a rolling window over them.

use std::collections::VecDeque;
use std::time::Duration;

/// Default number of frames kept by [`StatsWindow`].
pub const DEFAULT_WINDOW: usize = 120;

/// What one frame submitted and how many draws it took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Indexed draws issued by the quad batch.
    pub quad_batches: u32,
    /// Line-list draws issued by the line batch.
    pub line_batches: u32,
    /// Immediate (non-batched) draws.
    pub immediate_draws: u32,
    /// Quads submitted to the batch.
    pub quads: u32,
    /// Lines submitted to the batch.
    pub lines: u32,
}

impl FrameStats {
    pub fn draw_calls(&self) -> u32 {
        self.quad_batches + self.line_batches + self.immediate_draws
    }

    pub fn shapes(&self) -> u32 {
        self.quads + self.lines + self.immediate_draws
    }
}

struct Sample {
    stats: FrameStats,
    frame_time: Duration,
}

/// Rolling averages over the most recent frames.
pub struct StatsWindow {
    samples: VecDeque<Sample>,
    max_samples: usize,
}

impl StatsWindow {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW)
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
        }
    }

    pub fn push(&mut self, stats: FrameStats, frame_time: Duration) {
        self.samples.push_back(Sample { stats, frame_time });
        if self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
    }

    fn average(&self, value: impl Fn(&Sample) -> f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(value).sum::<f64>() / self.samples.len() as f64
    }

    pub fn average_draw_calls(&self) -> f64 {
        self.average(|s| f64::from(s.stats.draw_calls()))
    }

    pub fn average_shapes(&self) -> f64 {
        self.average(|s| f64::from(s.stats.shapes()))
    }

    /// Average shapes per draw call; 0 when nothing was drawn.
    pub fn shapes_per_draw(&self) -> f64 {
        let draws = self.average_draw_calls();
        if draws <= 0.0 {
            return 0.0;
        }
        self.average_shapes() / draws
    }

    /// Average frame time in milliseconds.
    pub fn frame_time_ms(&self) -> f64 {
        self.average(|s| s.frame_time.as_secs_f64()) * 1000.0
    }

    pub fn fps(&self) -> f64 {
        let total: f64 = self.samples.iter().map(|s| s.frame_time.as_secs_f64()).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.samples.len() as f64 / total
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Default for StatsWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(quad_batches: u32, quads: u32) -> FrameStats {
        FrameStats {
            quad_batches,
            quads,
            ..FrameStats::default()
        }
    }

    #[test]
    fn empty_window_is_zero() {
        let window = StatsWindow::new();
        assert_eq!(window.average_draw_calls(), 0.0);
        assert_eq!(window.frame_time_ms(), 0.0);
        assert_eq!(window.fps(), 0.0);
        assert_eq!(window.shapes_per_draw(), 0.0);
    }

    #[test]
    fn averages_over_samples() {
        let mut window = StatsWindow::new();
        window.push(frame(1, 100), Duration::from_millis(10));
        window.push(frame(3, 300), Duration::from_millis(30));

        assert_eq!(window.average_draw_calls(), 2.0);
        assert_eq!(window.average_shapes(), 200.0);
        assert_eq!(window.shapes_per_draw(), 100.0);
        assert!((window.frame_time_ms() - 20.0).abs() < 1e-9);
        assert!((window.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn max_samples_respected() {
        let mut window = StatsWindow::with_capacity(4);
        for i in 0..10 {
            window.push(frame(i, 0), Duration::from_millis(1));
        }
        assert_eq!(window.sample_count(), 4);
        // Frames 6..=9 remain.
        assert_eq!(window.average_draw_calls(), 7.5);
    }

    #[test]
    fn draw_calls_sum_all_sources() {
        let stats = FrameStats {
            quad_batches: 2,
            line_batches: 1,
            immediate_draws: 3,
            quads: 10,
            lines: 4,
        };
        assert_eq!(stats.draw_calls(), 6);
        assert_eq!(stats.shapes(), 17);
    }
}
