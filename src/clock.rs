use std::time::Instant;

/// Monotonic timestamp source for the attempt start time. The heuristic only
/// ever compares elapsed durations, so wall-clock time is never involved.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
