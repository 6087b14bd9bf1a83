//! Calendar periods.

use chrono::{Datelike, NaiveDate};
use evermore_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A validated year/month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Validate a year/month; fails with [`Error::InvalidPeriod`].
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidPeriod(format!("month {} outside 1-12", month)));
        }
        let period = Self { year, month };
        // Both ends must be representable for the month to be usable.
        period.first_day()?;
        period.last_day()?;
        Ok(period)
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| Error::InvalidPeriod(format!("{}-{:02} out of range", self.year, self.month)))
    }

    /// Last day of the month.
    pub fn last_day(&self) -> Result<NaiveDate> {
        let next_first = match self.month {
            12 => NaiveDate::from_ymd_opt(self.year + 1, 1, 1),
            m => NaiveDate::from_ymd_opt(self.year, m + 1, 1),
        };
        next_first
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| Error::InvalidPeriod(format!("{}-{:02} out of range", self.year, self.month)))
    }

    /// Number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().map(|d| d.day()).unwrap_or(0)
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// A day of this month; fails with [`Error::InvalidPeriod`] if it does not exist.
    pub fn day(&self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            Error::InvalidPeriod(format!("{}-{:02}-{:02} is not a date", self.year, self.month, day))
        })
    }

    /// The following month.
    pub fn next(&self) -> Result<Self> {
        match self.month {
            12 => Self::new(self.year + 1, 1),
            m => Self::new(self.year, m + 1),
        }
    }

    /// The preceding month.
    pub fn previous(&self) -> Result<Self> {
        match self.month {
            1 => Self::new(self.year - 1, 12),
            m => Self::new(self.year, m - 1),
        }
    }
}

impl std::fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
