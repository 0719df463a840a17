//! Fixed-rate frame pacing for the main loop.

use std::thread;
use std::time::{Duration, Instant};

/// Sleeps the caller to the next frame boundary
pub struct FrameScheduler {
    interval: Duration,
    next_deadline: Instant,
}

impl FrameScheduler {
    pub fn new(fps: u32) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    fn starting_at(fps: u32, start: Instant) -> Self {
        let interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        Self {
            interval,
            next_deadline: start + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next frame boundary
    pub fn wait(&mut self) {
        let now = Instant::now();
        let delay = self.advance(now);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    /// Move the deadline forward and return how long to sleep from `now`
    ///
    /// When more than one whole frame behind, the schedule re-anchors on
    /// `now` instead of bursting to catch up.
    fn advance(&mut self, now: Instant) -> Duration {
        let delay = self.next_deadline.saturating_duration_since(now);
        if now > self.next_deadline + self.interval {
            self.next_deadline = now + self.interval;
        } else {
            self.next_deadline += self.interval;
        }
        delay
    }
}
