//! Simulation clock.
//!
//! The host calls [`SimClock::advance`] once per rendered frame with the
//! frame delta. The clock turns that into a whole number of fixed simulation
//! steps, carrying leftover time into the next frame, so motion does not
//! depend on the display refresh rate.
//!
//! # Example
//!
//! ```ignore
//! use swarmkit::time::SimClock;
//!
//! let mut clock = SimClock::new(60.0, 8);
//!
//! // In your frame loop:
//! for _ in 0..clock.advance(frame_dt) {
//!     // one fixed step
//! }
//! println!("Elapsed: {:.2}s", clock.elapsed());
//! println!("Frame: {}", clock.frame());
//! ```

/// Fraction of a step tolerated as rounding error when accumulating.
const STEP_EPSILON: f32 = 1e-3;

/// Fixed-step time accumulator.
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Seconds per fixed step.
    step: f32,
    /// Upper bound on steps run for a single frame.
    max_steps: u32,
    /// Unsimulated time carried between frames.
    accumulator: f32,
    /// Simulated seconds (whole steps only).
    elapsed_secs: f32,
    /// Frames seen by `advance`.
    frame_count: u64,
    /// Fixed steps run in total.
    step_count: u64,
    /// Smoothed frames per second.
    fps: f32,
    /// Whether time is paused.
    paused: bool,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
}

impl SimClock {
    /// Create a clock stepping at `step_rate` Hz, running at most
    /// `max_steps` steps per frame.
    pub fn new(step_rate: f32, max_steps: u32) -> Self {
        Self {
            step: 1.0 / step_rate,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            elapsed_secs: 0.0,
            frame_count: 0,
            step_count: 0,
            fps: 0.0,
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Feed one frame delta and get the number of fixed steps to run.
    ///
    /// Negative, NaN and infinite deltas count as zero. A backlog larger
    /// than `max_steps` is dropped instead of being simulated later.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.frame_count += 1;
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }

        if self.paused {
            return 0;
        }

        self.accumulator += dt * self.time_scale;
        let mut steps = 0;
        while self.accumulator + self.step * STEP_EPSILON >= self.step {
            if steps == self.max_steps {
                log::warn!(
                    "frame took {:.3}s, dropping {:.3}s of simulation",
                    dt,
                    self.accumulator
                );
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= self.step;
            steps += 1;
        }
        self.accumulator = self.accumulator.max(0.0);

        self.step_count += steps as u64;
        self.elapsed_secs = self.step_count as f32 * self.step;
        steps
    }

    /// Seconds per fixed step.
    #[inline]
    pub fn step_seconds(&self) -> f32 {
        self.step
    }

    /// Total simulated time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Total fixed steps since start.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.step_count
    }

    /// Smoothed frames per second from the deltas passed to `advance`.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Pause time progression.
    ///
    /// While paused, `advance()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression after pausing.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = normal speed
    /// - `0.5` = half speed (slow motion)
    /// - `2.0` = double speed
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Reset counters and drop any carried time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.elapsed_secs = 0.0;
        self.frame_count = 0;
        self.step_count = 0;
        self.fps = 0.0;
        self.paused = false;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(60.0, 8)
    }
}
