use crate::error::{LifecycleError, Result};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of "now" for everything that checks a validity window.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and by the replay binary, where `advance` commands simulate
/// time passing between requests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward (or backward, for a negative duration).
    ///
    /// Fails, leaving the clock where it was, if the result is not a
    /// representable date.
    pub fn advance(&self, by: Duration) -> Result<()> {
        let mut now = self.now.lock();
        *now = now.checked_add_signed(by).ok_or_else(|| {
            LifecycleError::ValidationError(format!(
                "Cannot advance the clock by {}s",
                by.num_seconds()
            ))
        })?;
        Ok(())
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
