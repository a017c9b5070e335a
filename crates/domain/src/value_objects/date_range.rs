//! Inclusive range of calendar dates requested from the weather source

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range from `start` to `end`, both inclusive
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateRange(format!("{start} > {end}")));
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day
    #[must_use]
    pub const fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// A range of `days` days starting at `start`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDateRange` if `days` is zero or the end
    /// date overflows the calendar.
    pub fn starting_at(start: NaiveDate, days: u32) -> Result<Self, DomainError> {
        if days == 0 {
            return Err(DomainError::InvalidDateRange(
                "range must cover at least one day".to_string(),
            ));
        }
        let end = start
            .checked_add_days(chrono::Days::new(u64::from(days - 1)))
            .ok_or_else(|| DomainError::InvalidDateRange(format!("{start} + {days} days")))?;
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both ends
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn days(&self) -> u32 {
        // end >= start is a constructor invariant
        (self.end - self.start).num_days() as u32 + 1
    }

    /// Whether `date` falls inside the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..={}", self.start, self.end)
        }
    }
}
