use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Average frame timing over one reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub frames: u32,
    pub avg_frame_ms: f64,
    pub fps: f64,
}

/// Per-renderer frame clock.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// show up as one enormous frame. Every `report_interval` ticks the clock
/// produces a [`FrameReport`] and logs it at debug level.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    report_interval: u32,
    window_frames: u32,
    window_elapsed: Duration,
}

impl FrameClock {
    pub const DEFAULT_REPORT_INTERVAL: u32 = 240;

    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: None,
            frame_index: 0,
            dt_min,
            dt_max,
            report_interval: Self::DEFAULT_REPORT_INTERVAL,
            window_frames: 0,
            window_elapsed: Duration::ZERO,
        }
    }

    /// Sets how many frames each report covers (at least one).
    pub fn with_report_interval(mut self, frames: u32) -> Self {
        self.report_interval = frames.max(1);
        self
    }

    /// Forgets the previous tick, e.g. after the loop was suspended.
    pub fn reset(&mut self) {
        self.last = None;
        self.window_frames = 0;
        self.window_elapsed = Duration::ZERO;
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn tick(&mut self) -> (FrameTime, Option<FrameReport>) {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> (FrameTime, Option<FrameReport>) {
        let dt = match self.last {
            Some(last) => now
                .saturating_duration_since(last)
                .clamp(self.dt_min, self.dt_max),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);

        self.window_frames += 1;
        self.window_elapsed += dt;

        let report = if self.window_frames >= self.report_interval {
            let report = summarize(self.window_frames, self.window_elapsed);
            log::debug!(
                "frame {}: {:.2} ms avg, {:.1} fps",
                time.frame_index,
                report.avg_frame_ms,
                report.fps
            );
            self.window_frames = 0;
            self.window_elapsed = Duration::ZERO;
            Some(report)
        } else {
            None
        };

        (time, report)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(frames: u32, elapsed: Duration) -> FrameReport {
    let secs = elapsed.as_secs_f64();
    let avg = secs / frames as f64;
    FrameReport {
        frames,
        avg_frame_ms: avg * 1000.0,
        fps: if secs > 0.0 { frames as f64 / secs } else { 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_dt() {
        let mut clock = FrameClock::new();
        let (time, report) = clock.tick_at(Instant::now());
        assert_eq!(time.dt, 0.0);
        assert_eq!(time.frame_index, 0);
        assert!(report.is_none());
    }

    #[test]
    fn dt_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick_at(start);
        let (time, _) = clock.tick_at(start + Duration::from_secs(5));
        assert!((time.dt - 0.25).abs() < 1e-6);
        let (time, _) = clock.tick_at(start + Duration::from_secs(5));
        assert!((time.dt - 0.0001).abs() < 1e-6);
    }

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::new().with_report_interval(4);
        let mut reports = Vec::new();
        for i in 0..8u64 {
            let (_, report) = clock.tick_at(start + Duration::from_millis(10 * i));
            reports.extend(report);
        }
        assert_eq!(reports.len(), 2);
        // second window covers four full 10 ms frames
        let last = reports[1];
        assert_eq!(last.frames, 4);
        assert!((last.avg_frame_ms - 10.0).abs() < 1e-6);
        assert!((last.fps - 100.0).abs() < 1e-6);
        assert_eq!(clock.frame_index(), 8);
    }
}
