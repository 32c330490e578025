//! Host-side frame clock.
//!
//! The engine never reads a clock itself; `ParticleSystem::update` takes the
//! current time as an argument. [`FrameClock`] is a convenience for hosts
//! that need to produce that value, either from the wall clock or by fixed
//! steps for reproducible runs.
//!
//! # Example
//!
//! ```ignore
//! use pointfx::time::FrameClock;
//!
//! let mut clock = FrameClock::fixed(1.0 / 60.0);
//!
//! for _ in 0..600 {
//!     let now = clock.tick();
//!     system.update(now, None);
//! }
//! println!("simulated {:.2}s over {} frames", clock.now(), clock.frame());
//! ```

use std::time::{Duration, Instant};

/// Where a [`FrameClock`] takes its frame deltas from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Wall-clock time between ticks.
    Real,
    /// The same step every tick, in seconds.
    Fixed(f64),
}

/// Produces the monotonically increasing `now` values fed to the engine.
///
/// Time starts at 0. Pausing stops the reading; scaling speeds it up or
/// slows it down without affecting the frame count.
#[derive(Debug)]
pub struct FrameClock {
    mode: ClockMode,
    last_instant: Instant,
    now: f64,
    delta: f64,
    frame_count: u64,
    paused: bool,
    time_scale: f64,
}

impl FrameClock {
    /// A wall-clock driven clock reading 0.
    pub fn new() -> Self {
        Self::with_mode(ClockMode::Real)
    }

    /// A clock that advances by `step` seconds per tick.
    pub fn fixed(step: f64) -> Self {
        Self::with_mode(ClockMode::Fixed(step.max(0.0)))
    }

    pub fn with_mode(mode: ClockMode) -> Self {
        Self {
            mode,
            last_instant: Instant::now(),
            now: 0.0,
            delta: 0.0,
            frame_count: 0,
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Advance one frame and return the new reading in seconds.
    pub fn tick(&mut self) -> f64 {
        let instant = Instant::now();
        let raw = match self.mode {
            ClockMode::Real => instant.duration_since(self.last_instant).as_secs_f64(),
            ClockMode::Fixed(step) => step,
        };
        self.last_instant = instant;
        self.advance(raw)
    }

    /// Advance by an explicit `dt` (before scaling), ignoring the mode.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.paused {
            self.delta = 0.0;
            return self.now;
        }
        self.delta = dt.max(0.0) * self.time_scale;
        self.now += self.delta;
        self.frame_count += 1;
        self.now
    }

    /// Current reading in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Scaled time covered by the last tick.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ClockMode) {
        self.mode = mode;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop the reading. Ticks while paused report a zero delta.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Restart the reading where it stopped.
    ///
    /// Wall time spent paused is skipped, not caught up.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_instant = Instant::now();
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// `1.0` is real time. Negative and NaN values clamp to 0; an infinite
    /// scale is ignored.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_infinite() {
            return;
        }
        self.time_scale = scale.max(0.0);
    }

    /// Back to a zero reading and frame count. Mode and scale are kept.
    pub fn reset(&mut self) {
        self.last_instant = Instant::now();
        self.now = 0.0;
        self.delta = 0.0;
        self.frame_count = 0;
        self.paused = false;
    }

    /// Last delta as a [`Duration`], saturating at [`Duration::MAX`].
    #[inline]
    pub fn delta_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.delta).unwrap_or(Duration::MAX)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_starts_at_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_real_clock_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        let now = clock.tick();
        assert!(now > 0.0);
        assert_eq!(clock.delta(), now);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_step_ignores_wall_time() {
        let mut clock = FrameClock::fixed(0.25);
        thread::sleep(Duration::from_millis(20));
        clock.tick();
        clock.tick();
        assert_eq!(clock.now(), 0.5);
        assert_eq!(clock.delta(), 0.25);
    }

    #[test]
    fn test_pause_holds_reading() {
        let mut clock = FrameClock::fixed(0.5);
        clock.tick();
        clock.pause();
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), 1);

        clock.toggle_pause();
        assert_eq!(clock.tick(), 1.0);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FrameClock::fixed(1.0);
        clock.set_time_scale(0.5);
        assert_eq!(clock.tick(), 0.5);

        clock.set_time_scale(-3.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.tick(), 0.5);
    }

    #[test]
    fn test_infinite_scale_ignored() {
        let mut clock = FrameClock::fixed(0.5);
        clock.set_time_scale(f64::INFINITY);
        assert_eq!(clock.time_scale(), 1.0);
        clock.tick();
        assert_eq!(clock.delta_duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_huge_step_saturates_duration() {
        let mut clock = FrameClock::new();
        clock.set_mode(ClockMode::Fixed(f64::MAX));
        clock.set_time_scale(2.0);
        clock.tick();
        assert_eq!(clock.delta_duration(), Duration::MAX);
        assert_eq!(clock.mode(), ClockMode::Fixed(f64::MAX));
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut clock = FrameClock::fixed(0.1);
        clock.tick();
        clock.reset();
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.mode(), ClockMode::Fixed(0.1));
    }
}
