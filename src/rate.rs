//! Rate calculation for the admission ticker.
//!
//! A [`Rate`] turns a calls-per-interval budget into the minimum duration
//! between two consecutive dispatches: `time_reference / max_calls` plus a
//! fixed guard time. The guard time creates margin below a provider's stated
//! limit so that clock jitter on either side never tips a call over it.

use std::time::Duration;

use crate::error::ThrottleError;

/// Minimum inter-dispatch interval, computed from a call budget
///
/// Immutable after construction and cheap to clone; safe to share across
/// consumers without synchronization.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use throttler::Rate;
///
/// // 2 calls per second with a 50ms guard time => one call every 550ms
/// let rate = Rate::by_calls_per_second(2, Duration::from_millis(50)).unwrap();
/// assert_eq!(rate.calculate_rate(), Duration::from_millis(550));
/// ```
#[derive(Debug, Clone)]
pub struct Rate {
    period: Duration,
    guard_time: Duration,
}

impl Rate {
    /// Build a rate from a maximum number of calls per second
    pub fn by_calls_per_second(
        max_calls: i64,
        guard_time: Duration,
    ) -> Result<Self, ThrottleError> {
        Self::new(max_calls, guard_time, Duration::from_secs(1))
    }

    /// Build a rate from a maximum number of calls per minute
    pub fn by_calls_per_minute(
        max_calls: i64,
        guard_time: Duration,
    ) -> Result<Self, ThrottleError> {
        Self::new(max_calls, guard_time, Duration::from_secs(60))
    }

    /// Build a rate from a maximum number of calls per hour
    pub fn by_calls_per_hour(max_calls: i64, guard_time: Duration) -> Result<Self, ThrottleError> {
        Self::new(max_calls, guard_time, Duration::from_secs(3600))
    }

    fn new(
        max_calls: i64,
        guard_time: Duration,
        time_reference: Duration,
    ) -> Result<Self, ThrottleError> {
        if max_calls <= 0 {
            return Err(ThrottleError::InvalidMaxCalls);
        }
        // Duration division takes a u32; budgets beyond that already round
        // the period down to zero anyway
        let max_calls = max_calls.min(u32::MAX as i64) as u32;
        Ok(Rate {
            period: time_reference / max_calls,
            guard_time,
        })
    }

    /// The effective rate: `period + guard_time`
    ///
    /// This is the interval the dispatcher ticks at.
    pub fn calculate_rate(&self) -> Duration {
        self.period + self.guard_time
    }
}
