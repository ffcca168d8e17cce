use std::time::{Duration, Instant};

/// Frame-rate governor for the single-threaded game loops.
///
/// `tick` sleeps until the frame budget is used up, then returns the elapsed
/// time since the previous tick in seconds, clamped to `max_dt` so a stall
/// never produces a huge physics step.
#[derive(Debug)]
pub struct FrameClock {
    frame: Duration,
    max_dt: f32,
    last: Instant,
}

impl FrameClock {
    pub fn new(fps: u32, max_dt: f32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            max_dt,
            last: Instant::now(),
        }
    }

    /// Sleep to the frame cap and return the clamped delta time.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        clamp_dt(dt, self.max_dt)
    }

    /// Restart timing, e.g. after the loop was suspended by a child process.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }
}

/// Clamp a raw frame delta into `[0, max_dt]`. Non-finite input becomes 0.
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    dt.clamp(0.0, max_dt.max(0.0))
}
