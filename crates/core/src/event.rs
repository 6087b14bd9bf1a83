//! Completion events - atoms of the activity history.

use crate::activity::ActivityKind;
use crate::error::{Error, Result};
use crate::Time;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Wall-clock layouts accepted when a timestamp carries no offset.
const LOCAL_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A record that a couple completed an activity.
///
/// `completed_at` is kept verbatim as it came from the history log; it is
/// only interpreted when the event is bucketed into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCompletionEvent {
    /// Which activity was completed
    #[serde(rename = "activity_type")]
    pub kind: ActivityKind,

    /// Title of the activity at completion time
    #[serde(rename = "activity_title")]
    pub title: String,

    /// Completion timestamp
    pub completed_at: String,
}

impl ActivityCompletionEvent {
    /// Create an event from raw parts.
    pub fn new(kind: ActivityKind, title: impl Into<String>, completed_at: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            completed_at: completed_at.into(),
        }
    }

    /// Create an event stamped with an offset-aware time.
    pub fn at(kind: ActivityKind, title: impl Into<String>, at: Time) -> Self {
        Self::new(kind, title, at.to_rfc3339())
    }

    /// Completion time as local wall-clock time in `offset`.
    pub fn local_time(&self, offset: FixedOffset) -> Result<NaiveDateTime> {
        parse_local_timestamp(&self.completed_at, offset)
    }

    /// Calendar date of the completion in `offset`.
    pub fn local_date(&self, offset: FixedOffset) -> Result<NaiveDate> {
        self.local_time(offset).map(|t| t.date())
    }
}

/// Interpret a timestamp as local wall-clock time.
///
/// Offset-carrying (RFC 3339) timestamps are shifted into `offset`; naive
/// timestamps are taken to already be local.
pub fn parse_local_timestamp(raw: &str, offset: FixedOffset) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&offset).naive_local());
    }
    LOCAL_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .ok_or_else(|| Error::MalformedEvent(format!("unparsable timestamp {:?}", raw)))
}
