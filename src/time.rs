//! Host-side frame clock.
//!
//! The simulation never reads the wall clock itself; [`Simulation::advance`]
//! takes the elapsed time as an argument. `Time` is the helper a host loop uses
//! to produce that argument.
//!
//! ```ignore
//! let mut time = Time::new();
//! loop {
//!     let (_, dt) = time.update();   // 0.0 on the first frame
//!     simulation.advance(dt);
//!     renderer.upload(simulation.position_buffer());
//! }
//! ```
//!
//! [`Simulation::advance`]: crate::Simulation::advance

use std::time::{Duration, Instant};

/// Delta/elapsed bookkeeping for a render loop.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    /// `None` until the first `update`, which therefore reports a zero delta.
    last_frame: Option<Instant>,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Wall time spent paused, excluded from `elapsed`.
    pause_elapsed: Duration,
    paused_at: Option<Instant>,
    fixed_delta: Option<f32>,
    time_scale: f32,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: None,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
            paused_at: None,
            fixed_delta: None,
            time_scale: 1.0,
        }
    }

    /// Advance the clock. Call once per frame.
    ///
    /// Returns `(elapsed, delta)` in seconds. The first call after creation or
    /// [`Time::reset`] always reports a delta of 0 so the first simulation step
    /// cannot jump by the time spent on startup.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        self.delta_secs = match self.last_frame {
            None => 0.0,
            Some(last) => {
                let raw = now.duration_since(last).as_secs_f32();
                self.fixed_delta.unwrap_or(raw) * self.time_scale
            }
        };
        self.last_frame = Some(now);

        let raw_elapsed = now.duration_since(self.start).saturating_sub(self.pause_elapsed);
        self.elapsed_secs = raw_elapsed.as_secs_f32() * self.time_scale;

        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop time. While paused, `delta()` is 0 and `elapsed()` holds still.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            if let Some(at) = self.paused_at.take() {
                self.pause_elapsed += now.duration_since(at);
            }
            // The paused span must not show up as one huge delta.
            if self.last_frame.is_some() {
                self.last_frame = Some(now);
            }
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

    /// Report `delta` instead of measured frame time (e.g. `1.0 / 60.0` for a
    /// headless run). `None` goes back to wall-clock deltas.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Multiplier on delta and elapsed. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Back to the freshly-created state, keeping fixed delta and time scale.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_frame = None;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = now;
        self.paused = false;
        self.pause_elapsed = Duration::ZERO;
        self.paused_at = None;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
