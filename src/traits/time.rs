//! Time source abstraction
//!
//! The navigator core never reads a clock directly. Dwell timing (how
//! long the vehicle has been inside a waypoint's acceptance radius) goes
//! through [`TimeSource`] so the firmware can plug in its monotonic
//! timer and host tests can drive time by hand with [`MockTime`].

use core::cell::Cell;

/// Monotonic microsecond clock.
///
/// # Example
///
/// ```
/// use rtl_navigator::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let entered = time.now_us();
/// time.advance_secs(1.5);
/// assert!((time.elapsed_secs_since(entered) - 1.5).abs() < 1e-6);
/// ```
pub trait TimeSource {
    /// Microseconds since an arbitrary fixed origin (boot).
    fn now_us(&self) -> u64;

    /// Microseconds elapsed since `reference_us`, saturating at zero.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }

    /// Seconds elapsed since `reference_us`.
    fn elapsed_secs_since(&self, reference_us: u64) -> f32 {
        self.elapsed_since(reference_us) as f32 / 1_000_000.0
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Hand-driven clock for host tests.
///
/// Interior mutability lets a test keep advancing the clock while a
/// borrowed `&MockTime` is held by the code under test.
#[derive(Debug, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Clock starting at `us`.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }

    /// Advance by a (non-negative) number of seconds.
    pub fn advance_secs(&self, secs: f32) {
        self.advance((secs.max(0.0) * 1_000_000.0) as u64);
    }
}

impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_time_starts_at_zero() {
        let time = MockTime::new();
        assert_eq!(time.now_us(), 0);
    }

    #[test]
    fn test_mock_time_with_initial() {
        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
    }

    #[test]
    fn test_mock_time_advance_secs() {
        let time = MockTime::new();
        time.advance_secs(0.5);
        assert_eq!(time.now_us(), 500_000);

        // Negative durations are ignored
        time.advance_secs(-2.0);
        assert_eq!(time.now_us(), 500_000);
    }

    #[test]
    fn test_elapsed_since_saturates() {
        let time = MockTime::new();
        time.set(1_000);
        assert_eq!(time.elapsed_since(5_000), 0);
        assert_eq!(time.elapsed_since(400), 600);
    }

    #[test]
    fn test_elapsed_through_reference() {
        let time = MockTime::new();
        let borrowed: &MockTime = &time;
        let start = borrowed.now_us();

        time.advance(2_500_000);
        assert!((borrowed.elapsed_secs_since(start) - 2.5).abs() < 1e-6);
    }
}
