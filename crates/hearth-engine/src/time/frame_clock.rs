use std::time::{Duration, Instant};

use anyhow::Result;

use crate::module::ClockModule;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped seconds since the previous tick.
    pub dt: f32,

    /// Seconds since the clock was initialized.
    pub elapsed: f32,

    /// Monotonic frame counter (index of the tick that produced this snapshot).
    pub frame_index: u64,
}

/// Clock module.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger, minimized, or stalls on a blocking load. Elapsed
/// time is wall-clock and unclamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Option<Instant>,
    last: Option<Instant>,
    dt: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with default clamps (0.1ms .. 250ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            started: None,
            last: None,
            dt: Duration::ZERO,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts delta measurement from now without touching elapsed time.
    ///
    /// Useful after a long blocking operation so the next delta is not clamped
    /// to the maximum.
    pub fn reset(&mut self) {
        if self.last.is_some() {
            self.last = Some(Instant::now());
        }
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) {
        let Some(last) = self.last else {
            debug_assert!(false, "clock ticked before init");
            return;
        };

        let dt = now.saturating_duration_since(last);
        self.dt = dt.clamp(self.dt_min, self.dt_max);
        self.last = Some(now);
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn snapshot(&self) -> FrameTime {
        FrameTime {
            dt: self.delta(),
            elapsed: self.elapsed(),
            frame_index: self.frame_index,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockModule for FrameClock {
    fn init(&mut self) -> Result<()> {
        debug_assert!(self.started.is_none(), "clock initialized twice");
        let now = Instant::now();
        self.started = Some(now);
        self.last = Some(now);
        self.dt = Duration::ZERO;
        self.frame_index = 0;
        Ok(())
    }

    fn quit(&mut self) {
        debug_assert!(self.started.is_some(), "clock quit without init");
        self.started = None;
        self.last = None;
    }

    fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn delta(&self) -> f32 {
        self.dt.as_secs_f32()
    }

    fn elapsed(&self) -> f32 {
        self.started
            .map_or(0.0, |s| Instant::now().saturating_duration_since(s).as_secs_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> (FrameClock, Instant) {
        let mut clock = FrameClock::new();
        clock.init().unwrap();
        let base = clock.last.unwrap();
        (clock, base)
    }

    #[test]
    fn delta_is_zero_before_first_tick() {
        let (clock, _) = started();
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame_index(), 0);
    }

    #[test]
    fn delta_measures_time_between_ticks() {
        let (mut clock, base) = started();
        clock.tick_at(base + Duration::from_millis(16));
        assert!((clock.delta() - 0.016).abs() < 1e-6);
        clock.tick_at(base + Duration::from_millis(48));
        assert!((clock.delta() - 0.032).abs() < 1e-6);
        assert_eq!(clock.frame_index(), 2);
    }

    #[test]
    fn long_stall_is_clamped() {
        let (mut clock, base) = started();
        clock.tick_at(base + Duration::from_secs(5));
        assert!((clock.delta() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn zero_gap_is_clamped_up() {
        let (mut clock, base) = started();
        clock.tick_at(base);
        assert!(clock.delta() > 0.0);
    }

    #[test]
    fn custom_clamps_apply() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(10));
        clock.init().unwrap();
        let base = clock.last.unwrap();
        clock.tick_at(base + Duration::from_millis(40));
        assert!((clock.delta() - 0.010).abs() < 1e-6);
    }

    #[test]
    fn elapsed_is_zero_when_not_initialized() {
        assert_eq!(FrameClock::new().elapsed(), 0.0);
    }

    #[test]
    fn snapshot_carries_frame_index() {
        let (mut clock, base) = started();
        clock.tick_at(base + Duration::from_millis(5));
        let ft = clock.snapshot();
        assert_eq!(ft.frame_index, 1);
        assert!(ft.elapsed >= 0.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "clock initialized twice")]
    fn double_init_panics() {
        let (mut clock, _) = started();
        let _ = clock.init();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "clock quit without init")]
    fn quit_without_init_panics() {
        FrameClock::new().quit();
    }
}
