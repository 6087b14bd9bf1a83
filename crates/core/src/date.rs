//! Canonical calendar date keys (`YYYY-MM-DD`).

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Layout of a date key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Zero-padded `YYYY-MM-DD` key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|e| Error::InvalidPeriod(format!("bad date key {:?}: {}", key, e)))
}
