//! Frame clock for the viewer loop.
//!
//! One [`FrameClock::tick`] per redraw gives the `(elapsed, delta)` pair the
//! sculpture consumes, plus a frame counter and a periodically refreshed FPS.

use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Averages frame rate over fixed wall-clock windows.
#[derive(Debug)]
struct FpsMeter {
    window_start: Instant,
    frames_in_window: u32,
    value: f32,
}

impl FpsMeter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            value: 0.0,
        }
    }

    /// Count one frame. Returns `true` when a window closed and `value` changed.
    fn record(&mut self, now: Instant) -> bool {
        self.frames_in_window += 1;
        let span = now.duration_since(self.window_start);
        if span < FPS_WINDOW {
            return false;
        }
        self.value = self.frames_in_window as f32 / span.as_secs_f32();
        self.frames_in_window = 0;
        self.window_start = now;
        true
    }
}

/// Wall-clock timing for a display-synchronised frame loop.
#[derive(Debug)]
pub struct FrameClock {
    origin: Instant,
    previous: Instant,
    time: f32,
    dt: f32,
    frames: u64,
    fps: FpsMeter,
    /// Replaces measured dt when set.
    step: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            previous: now,
            time: 0.0,
            dt: 0.0,
            frames: 0,
            fps: FpsMeter::new(now),
            step: None,
        }
    }

    /// Advance to the current instant. Call once per frame.
    ///
    /// Returns `(time, dt, fps_refreshed)`, times in seconds.
    pub fn tick(&mut self) -> (f32, f32, bool) {
        let now = Instant::now();
        let measured = now.duration_since(self.previous).as_secs_f32();
        self.previous = now;

        match self.step {
            Some(step) => {
                self.dt = step;
                self.time += step;
            }
            None => {
                self.dt = measured;
                self.time = now.duration_since(self.origin).as_secs_f32();
            }
        }
        self.frames += 1;

        let refreshed = self.fps.record(now);
        (self.time, self.dt, refreshed)
    }

    /// Seconds since the clock started, or the sum of fixed steps.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.dt
    }

    /// Ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Last windowed frame rate; zero until the first half second has passed.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps.value
    }

    /// Step by a constant `dt` instead of wall-clock time. `None` restores
    /// measured timing.
    pub fn set_fixed_delta(&mut self, step: Option<f32>) {
        self.step = step;
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
    fn test_fresh_clock_is_zeroed() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_tick_measures_wall_time() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (time, dt, _) = clock.tick();

        assert!(time >= 0.01);
        assert!(dt >= 0.01);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_step_ignores_wall_time() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta(Some(0.25));

        thread::sleep(Duration::from_millis(50));
        clock.tick();
        clock.tick();

        assert_eq!(clock.delta(), 0.25);
        assert_eq!(clock.elapsed(), 0.5);
    }

    #[test]
    fn test_fps_refreshes_after_window() {
        let start = Instant::now();
        let mut meter = FpsMeter::new(start);
        assert!(!meter.record(start + Duration::from_millis(100)));
        assert!(!meter.record(start + Duration::from_millis(200)));
        assert!(meter.record(start + Duration::from_millis(500)));
        // Three frames over half a second.
        assert!((meter.value - 6.0).abs() < 1e-3);
        assert_eq!(meter.frames_in_window, 0);
    }
}
