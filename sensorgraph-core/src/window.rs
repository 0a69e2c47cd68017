use crate::error::SensorgraphError;
use chrono::{Duration, NaiveDateTime};

/// The trailing span of history a report covers, anchored at a supplied `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    now: NaiveDateTime,
    hours: u32,
    cutoff: NaiveDateTime,
}

impl LookbackWindow {
    /// # Errors
    ///
    /// Returns `InvalidLookback` for zero hours, or when `now - hours` is
    /// outside the representable date range.
    pub fn new(now: NaiveDateTime, hours: u32) -> Result<Self, SensorgraphError> {
        let invalid = || SensorgraphError::InvalidLookback(i64::from(hours));
        if hours == 0 {
            return Err(invalid());
        }
        let cutoff = Duration::try_hours(i64::from(hours))
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(invalid)?;
        Ok(Self { now, hours, cutoff })
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Readings must be strictly after this instant to be in the window.
    pub fn cutoff(&self) -> NaiveDateTime {
        self.cutoff
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp > self.cutoff()
    }
}
