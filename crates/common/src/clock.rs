//! Session clock.
//!
//! Gesture timestamps are fractional seconds measured from a monotonic
//! epoch captured when tracking starts. Replayed recordings supply their
//! own timestamps and never touch the wall clock.

use std::time::{Duration, Instant};

/// A monotonic clock anchored to the moment a tracking session started.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant tracking started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since the session started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Seconds between the epoch and a later instant (zero if earlier).
    pub fn secs_at(&self, instant: Instant) -> f64 {
        instant
            .checked_duration_since(self.epoch)
            .unwrap_or(Duration::ZERO)
            .as_secs_f64()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        let elapsed = clock.elapsed_secs();
        assert!(elapsed >= 0.0);
        assert!(elapsed < 1.0);
    }

    #[test]
    fn test_secs_at_before_epoch_is_zero() {
        let before = Instant::now();
        let clock = SessionClock::start();
        assert_eq!(clock.secs_at(before), 0.0);

        let later = clock.epoch + Duration::from_millis(1500);
        assert!((clock.secs_at(later) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_epoch_wall_is_rfc3339() {
        let clock = SessionClock::start();
        assert!(chrono::DateTime::parse_from_rfc3339(clock.epoch_wall()).is_ok());
    }
}
