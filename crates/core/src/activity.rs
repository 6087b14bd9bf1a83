//! Activity kinds and their fixed effects.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// The closed set of activities a couple can complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    /// Small everyday ritual.
    DailyRitual,
    /// Weekly shared gesture.
    WeeklyGesture,
    /// Monthly big gesture.
    MonthlyBigGesture,
}

impl ActivityKind {
    /// Every kind, in catalog order.
    pub const ALL: [ActivityKind; 3] = [
        ActivityKind::DailyRitual,
        ActivityKind::WeeklyGesture,
        ActivityKind::MonthlyBigGesture,
    ];

    /// Wire name used by history logs and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::DailyRitual => "dailyRitual",
            ActivityKind::WeeklyGesture => "weeklyGesture",
            ActivityKind::MonthlyBigGesture => "monthlyBigGesture",
        }
    }

    /// Intended recurrence of the activity.
    pub fn cadence(&self) -> Cadence {
        match self {
            ActivityKind::DailyRitual => Cadence::Daily,
            ActivityKind::WeeklyGesture => Cadence::Weekly,
            ActivityKind::MonthlyBigGesture => Cadence::Monthly,
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::DailyRitual => "Daily Ritual",
            ActivityKind::WeeklyGesture => "Weekly Gesture",
            ActivityKind::MonthlyBigGesture => "Monthly Big Gesture",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dailyRitual" | "daily-ritual" | "daily" => Ok(ActivityKind::DailyRitual),
            "weeklyGesture" | "weekly-gesture" | "weekly" => Ok(ActivityKind::WeeklyGesture),
            "monthlyBigGesture" | "monthly-big-gesture" | "monthly" => {
                Ok(ActivityKind::MonthlyBigGesture)
            }
            other => Err(Error::UnknownActivityKind(other.to_string())),
        }
    }
}

/// Recurrence period of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Once a day
    Daily,
    /// Once a week
    Weekly,
    /// Once a month
    Monthly,
}

/// One axis of relationship progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricDimension {
    /// Communication
    Communication,
    /// Intimacy
    Intimacy,
    /// Trust
    Trust,
}

impl MetricDimension {
    /// Every dimension.
    pub const ALL: [MetricDimension; 3] = [
        MetricDimension::Communication,
        MetricDimension::Intimacy,
        MetricDimension::Trust,
    ];
}

/// Per-dimension increase applied by one completion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricDelta {
    /// Communication increase
    pub communication: f64,
    /// Intimacy increase
    pub intimacy: f64,
    /// Trust increase
    pub trust: f64,
}

impl MetricDelta {
    /// Create a delta.
    pub const fn new(communication: f64, intimacy: f64, trust: f64) -> Self {
        Self {
            communication,
            intimacy,
            trust,
        }
    }

    /// Delta along one dimension.
    pub fn get(&self, dimension: MetricDimension) -> f64 {
        match dimension {
            MetricDimension::Communication => self.communication,
            MetricDimension::Intimacy => self.intimacy,
            MetricDimension::Trust => self.trust,
        }
    }
}

/// Catalog entry for one activity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    /// Which activity this describes
    pub kind: ActivityKind,

    /// Display title
    pub title: String,

    /// Display description
    pub description: String,

    /// Recurrence
    pub cadence: Cadence,

    /// Metric increase per completion
    pub metric_delta: MetricDelta,

    /// Tree growth increase per completion
    pub growth_delta: f64,
}

/// Completion flag for the current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityStatus {
    /// Whether the activity has been completed
    pub completed: bool,
}
