//! Frame clock

use std::time::Instant;

/// Tracks total and per-frame elapsed time in seconds
///
/// The clock starts on the first call to [`get_delta`](Clock::get_delta),
/// which therefore reports 0.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    start_time: Option<Instant>,
    old_time: Option<Instant>,
    elapsed_time: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }

    /// Seconds since the clock started, as of the last delta
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    /// Seconds since the previous call
    pub fn get_delta(&mut self) -> f32 {
        self.delta_at(Instant::now())
    }

    /// Moves elapsed time forward by `delta` seconds without reading the
    /// wall clock. Negative deltas count as zero; returns the applied delta.
    pub fn advance(&mut self, delta: f32) -> f32 {
        let delta = delta.max(0.0);
        self.elapsed_time += delta;
        delta
    }

    /// [`get_delta`](Clock::get_delta) against an explicit timestamp.
    /// Timestamps earlier than the previous one count as zero elapsed.
    pub fn delta_at(&mut self, now: Instant) -> f32 {
        let Some(old_time) = self.old_time else {
            self.start_time = Some(now);
            self.old_time = Some(now);
            return 0.0;
        };

        let delta = now.saturating_duration_since(old_time).as_secs_f32();
        self.old_time = Some(now.max(old_time));
        self.elapsed_time += delta;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    #[test]
    fn test_first_delta_starts_clock() {
        let mut clock = Clock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.delta_at(Instant::now()), 0.0);
        assert!(clock.is_running());
        assert_eq!(clock.elapsed_time(), 0.0);
    }

    #[test]
    fn test_deltas_accumulate_into_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        clock.delta_at(t0);

        let d1 = clock.delta_at(t0 + Duration::from_millis(100));
        let d2 = clock.delta_at(t0 + Duration::from_millis(150));

        assert_relative_eq!(d1, 0.1, epsilon = 1e-6);
        assert_relative_eq!(d2, 0.05, epsilon = 1e-6);
        assert_relative_eq!(clock.elapsed_time(), 0.15, epsilon = 1e-6);
    }

    #[test]
    fn test_advance_adds_to_elapsed_time() {
        let mut clock = Clock::new();
        assert_eq!(clock.advance(0.25), 0.25);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.advance(0.5), 0.5);
        assert_eq!(clock.elapsed_time(), 0.75);
    }

    #[test]
    fn test_time_never_runs_backwards() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut clock = Clock::new();
        clock.delta_at(t0);
        clock.delta_at(t0 + Duration::from_millis(10));

        assert_eq!(clock.delta_at(t0), 0.0);
        let d = clock.delta_at(t0 + Duration::from_millis(20));
        assert_relative_eq!(d, 0.01, epsilon = 1e-6);
    }
}
