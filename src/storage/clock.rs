use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::Error;

const STEP: TimeDelta = TimeDelta::microseconds(1);

/// Source of record timestamps.
///
/// Every call to [`Clock::now`] returns a time strictly later than the
/// previous one, even when the system clock has not advanced (or has gone
/// backwards). A modification is therefore always stamped after the one
/// before it.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    last: Option<DateTime<Utc>>,
}

impl Clock {
    /// Returns the next timestamp.
    pub fn now(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last {
            // observe() only admits timestamps that have a successor
            Some(last) if now <= last => last.checked_add_signed(STEP).unwrap_or(last),
            _ => now,
        };
        self.last = Some(next);
        next
    }

    /// Records a timestamp that was issued elsewhere, such as one read back
    /// from disk, so later stamps come after it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOutOfRange`] if no later timestamp could
    /// follow `at`.
    pub fn observe(&mut self, at: DateTime<Utc>) -> Result<(), Error> {
        if at.checked_add_signed(STEP).is_none() {
            return Err(Error::TimestampOutOfRange { at });
        }
        if self.last.is_none_or(|last| at > last) {
            self.last = Some(at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_strictly_increase() {
        let mut clock = Clock::default();
        let stamps: Vec<_> = (0..1000).map(|_| clock.now()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn observed_future_time_is_respected() {
        let mut clock = Clock::default();
        let future = Utc::now() + TimeDelta::days(1);
        clock.observe(future).unwrap();
        assert!(clock.now() > future);
    }

    #[test]
    fn observing_the_past_changes_nothing() {
        let mut clock = Clock::default();
        let first = clock.now();
        clock.observe(first - TimeDelta::days(1)).unwrap();
        assert!(clock.now() > first);
    }

    #[test]
    fn timestamp_without_successor_is_rejected() {
        let mut clock = Clock::default();
        let end = DateTime::<Utc>::MAX_UTC;

        assert_eq!(
            clock.observe(end),
            Err(Error::TimestampOutOfRange { at: end })
        );
        assert!(clock.now() < end);

        let almost = end - STEP;
        clock.observe(almost).unwrap();
        assert_eq!(clock.now(), end);
    }
}
