//! Time source for token timestamps.

use std::time::SystemTime;

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    /// Returns seconds since the Unix epoch.
    fn unix_now(&self) -> i64;
}

/// Wall-clock time from [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> i64 {
        // A clock before 1970 reports negative seconds instead of failing
        match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
        }
    }
}

/// Clock frozen at a fixed instant.
///
/// # Examples
///
/// ```
/// use token_forge::clock::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1_700_000_000);
/// assert_eq!(clock.unix_now(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(i64);

impl FixedClock {
    /// Creates a clock that always reports `unix_seconds`.
    #[must_use]
    pub const fn new(unix_seconds: i64) -> Self {
        Self(unix_seconds)
    }
}

impl Clock for FixedClock {
    fn unix_now(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn unix_now(&self) -> i64 {
        (**self).unix_now()
    }
}
