//! Time management utilities
//!
//! Times are host clock readings in milliseconds, as handed to `on_tick`.

/// Minimum-spacing gate for frame-driven work.
///
/// The first request always passes. Later requests pass only when at least
/// `interval_ms` has elapsed since the last request that passed. Rejected
/// requests are dropped, not queued. Non-finite clock readings never pass
/// and are not recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct Throttle {
    interval_ms: f64,
    last_fired_ms: Option<f64>,
}

impl Throttle {
    /// Create a throttle with the given minimum spacing
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    /// Minimum spacing between passing requests
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Change the minimum spacing; the last fire time is kept
    pub fn set_interval_ms(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    /// Time of the last request that passed
    pub fn last_fired_ms(&self) -> Option<f64> {
        self.last_fired_ms
    }

    /// Whether a request at `now_ms` would pass, without recording it
    pub fn is_ready(&self, now_ms: f64) -> bool {
        if !now_ms.is_finite() {
            return false;
        }
        match self.last_fired_ms {
            None => true,
            Some(last) => now_ms - last >= self.interval_ms,
        }
    }

    /// Request a fire at `now_ms`; returns true and records the time if it passes
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if !self.is_ready(now_ms) {
            return false;
        }
        self.last_fired_ms = Some(now_ms);
        true
    }

    /// Forget the last fire time so the next request passes
    pub fn reset(&mut self) {
        self.last_fired_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_always_passes() {
        let mut throttle = Throttle::new(80.0);
        assert!(throttle.try_fire(0.0));
        assert_eq!(throttle.last_fired_ms(), Some(0.0));
    }

    #[test]
    fn test_spacing_measured_from_last_pass() {
        let mut throttle = Throttle::new(80.0);
        let fired: Vec<f64> = [0.0, 16.0, 79.9, 80.0, 150.0, 160.0, 240.0]
            .into_iter()
            .filter(|&t| throttle.try_fire(t))
            .collect();

        // 150 is only 70ms after 80, so it is dropped and 160 passes instead
        assert_eq!(fired, vec![0.0, 80.0, 160.0, 240.0]);
    }

    #[test]
    fn test_zero_interval_passes_everything() {
        let mut throttle = Throttle::new(0.0);
        assert!(throttle.try_fire(5.0));
        assert!(throttle.try_fire(5.0));
    }

    #[test]
    fn test_non_finite_clock_is_ignored() {
        let mut throttle = Throttle::new(80.0);
        assert!(!throttle.try_fire(f64::NAN));
        assert!(!throttle.try_fire(f64::INFINITY));
        assert_eq!(throttle.last_fired_ms(), None);

        assert!(throttle.try_fire(1e9));
        assert!(!throttle.try_fire(f64::NAN));
        assert!(throttle.try_fire(1e9 + 80.0));
    }

    #[test]
    fn test_reset() {
        let mut throttle = Throttle::new(1000.0);
        assert!(throttle.try_fire(10.0));
        assert!(!throttle.try_fire(20.0));
        throttle.reset();
        assert!(throttle.try_fire(20.0));
    }
}
