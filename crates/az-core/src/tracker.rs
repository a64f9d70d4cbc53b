use crate::clock::{Clock, SystemClock};
use crate::frame::ProgressFrame;
use crate::surface::DisplaySurface;
use std::time::{Duration, Instant};

/// Number of cells in the progress bar.
pub const BAR_WIDTH: usize = 50;

/// Minimum time between two rate recomputations.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// How a new rate is derived once the sampling interval has passed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RateEstimator {
    /// Size of the chunk that closed the window divided by the window length.
    #[default]
    LastChunk,
    /// Every byte recorded in the window divided by the window length.
    Window,
    /// Exponentially weighted average of window rates. `alpha` is the weight
    /// of the newest sample, in `(0, 1]`.
    Ewma { alpha: f64 },
}

impl RateEstimator {
    pub const DEFAULT_EWMA_ALPHA: f64 = 0.3;

    fn next_rate(&self, previous: Option<f64>, chunk: u64, window: u64, elapsed: f64) -> f64 {
        match *self {
            RateEstimator::LastChunk => chunk as f64 / elapsed,
            RateEstimator::Window => window as f64 / elapsed,
            RateEstimator::Ewma { alpha } => {
                let sample = window as f64 / elapsed;
                let alpha = alpha.clamp(f64::EPSILON, 1.0);
                match previous {
                    Some(prev) => alpha * sample + (1.0 - alpha) * prev,
                    None => sample,
                }
            }
        }
    }
}

/// Tracks one transfer: cumulative bytes against a known total, plus a
/// sampled transfer rate. Every [`record`](Self::record) redraws the
/// progress line on the tracker's surface.
pub struct TransferTracker<S, C = SystemClock> {
    total: u64,
    current: u64,
    width: usize,
    last_sample: Instant,
    rate: f64,
    window_bytes: u64,
    sampled: bool,
    estimator: RateEstimator,
    clock: C,
    surface: S,
}

impl<S: DisplaySurface> TransferTracker<S, SystemClock> {
    pub fn new(total: u64, surface: S) -> Self {
        Self::with_clock(total, surface, SystemClock)
    }
}

impl<S: DisplaySurface, C: Clock> TransferTracker<S, C> {
    pub fn with_clock(total: u64, surface: S, clock: C) -> Self {
        let last_sample = clock.now();
        Self {
            total,
            current: 0,
            width: BAR_WIDTH,
            last_sample,
            rate: 0.0,
            window_bytes: 0,
            sampled: false,
            estimator: RateEstimator::default(),
            clock,
            surface,
        }
    }

    pub fn with_estimator(mut self, estimator: RateEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Accounts for one chunk of `n` bytes, refreshes the rate if the
    /// sampling interval has passed, then redraws.
    pub fn record(&mut self, n: usize) {
        let n = n as u64;
        self.current = self.current.saturating_add(n);
        self.window_bytes = self.window_bytes.saturating_add(n);

        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.last_sample);
        if elapsed >= SAMPLE_INTERVAL {
            let previous = self.sampled.then_some(self.rate);
            self.rate =
                self.estimator
                    .next_rate(previous, n, self.window_bytes, elapsed.as_secs_f64());
            self.sampled = true;
            self.window_bytes = 0;
            self.last_sample = now;
        }

        let frame = self.frame();
        self.surface.redraw(&frame);
    }

    /// Signals the surface that no more frames will follow.
    pub fn finish(&mut self) {
        self.surface.finish();
    }

    pub fn frame(&self) -> ProgressFrame {
        ProgressFrame::compute(self.current, self.total, self.width, self.rate)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Bytes per second as of the last sample.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::surface::CaptureSurface;
    use crate::units::MB;

    fn tracker(total: u64, clock: &ManualClock) -> TransferTracker<CaptureSurface, &ManualClock> {
        TransferTracker::with_clock(total, CaptureSurface::new(), clock)
    }

    #[test]
    fn current_is_running_sum() {
        let clock = ManualClock::new();
        let mut t = tracker(1000, &clock);
        let chunks = [10usize, 0, 250, 3, 700];

        let mut expected = 0u64;
        let mut previous = 0u64;
        for n in chunks {
            t.record(n);
            expected += n as u64;
            assert_eq!(t.current(), expected);
            assert!(t.current() >= previous);
            previous = t.current();
        }
        assert_eq!(t.surface().frames.len(), chunks.len());
    }

    #[test]
    fn rate_waits_for_sampling_interval() {
        let clock = ManualClock::new();
        let mut t = tracker(10_000, &clock);

        clock.advance(Duration::from_millis(200));
        t.record(1000);
        assert_eq!(t.rate(), 0.0);

        clock.advance(Duration::from_millis(300));
        t.record(1000);
        assert_eq!(t.rate(), 2000.0);

        // inside the next window the sample is kept as is
        clock.advance(Duration::from_millis(100));
        t.record(4000);
        assert_eq!(t.rate(), 2000.0);
        clock.advance(Duration::from_millis(399));
        t.record(1);
        assert_eq!(t.rate(), 2000.0);

        clock.advance(Duration::from_millis(1));
        t.record(500);
        assert_eq!(t.rate(), 1000.0);
    }

    #[test]
    fn window_estimator_counts_every_byte_in_window() {
        let clock = ManualClock::new();
        let mut t = tracker(10_000, &clock).with_estimator(RateEstimator::Window);

        t.record(300);
        clock.advance(Duration::from_millis(250));
        t.record(300);
        clock.advance(Duration::from_millis(250));
        t.record(400);
        assert_eq!(t.rate(), 2000.0);
    }

    #[test]
    fn ewma_estimator_smooths_samples() {
        let clock = ManualClock::new();
        let mut t = tracker(0, &clock).with_estimator(RateEstimator::Ewma { alpha: 0.5 });

        clock.advance(Duration::from_secs(1));
        t.record(1000);
        assert_eq!(t.rate(), 1000.0);

        clock.advance(Duration::from_secs(1));
        t.record(3000);
        assert_eq!(t.rate(), 2000.0);
    }

    #[test]
    fn bar_never_exceeds_width() {
        let clock = ManualClock::new();
        let mut t = tracker(100, &clock);
        for _ in 0..5 {
            t.record(60);
            let frame = t.surface().last().cloned().unwrap();
            assert!(frame.filled <= t.width());
        }
        assert_eq!(t.current(), 300);
        assert_eq!(t.frame().filled, BAR_WIDTH);
        assert_eq!(t.frame().percentage_text(), "300.0%");
    }

    #[test]
    fn ten_mebibytes_in_ten_chunks() {
        let clock = ManualClock::new();
        let total = 10 * MB;
        let mut t = tracker(total, &clock);

        for _ in 0..10 {
            clock.advance(Duration::from_millis(500));
            t.record(MB as usize);
        }

        assert_eq!(t.current(), total);
        let frame = t.surface().last().cloned().unwrap();
        assert_eq!(frame.filled, BAR_WIDTH);
        assert_eq!(frame.empty_cells(), "");
        assert_eq!(frame.percentage_text(), "100.0%");
        assert_eq!(frame.rate_text(), "(2.00 MB/s)");
        assert!(frame.to_string().ends_with("[10.00MB/10.00MB]"));
    }

    #[test]
    fn unknown_total_is_safe() {
        let clock = ManualClock::new();
        let mut t = tracker(0, &clock);
        t.record(2048);
        t.record(0);

        let frame = t.surface().last().cloned().unwrap();
        assert_eq!(frame.filled, 0);
        assert_eq!(frame.percentage_text(), "--.-%");
        assert!(!frame.to_string().contains("NaN"));
    }

    #[test]
    fn finish_reaches_surface() {
        let mut t = TransferTracker::new(1, CaptureSurface::new());
        t.record(1);
        t.finish();
        assert!(t.into_surface().finished);
    }
}
