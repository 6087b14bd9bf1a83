//! Evermore core data models.
//!
//! This crate defines the activity catalog, the per-couple progress state,
//! completion events and the error taxonomy shared by the other crates.

#![warn(missing_docs)]

// Identities
mod id;

// Activities and their effects
mod activity;
mod catalog;

// State and history
mod progress;
mod event;
mod date;

// Ambient
mod config;
mod error;

// Re-exports
pub use id::CoupleId;

pub use activity::{
    ActivityKind, ActivityDefinition, ActivityStatus, Cadence, MetricDelta, MetricDimension,
};
pub use catalog::{ActivityCatalog, standard_definitions};

pub use progress::{Metrics, ProgressState, MAX_LEVEL, MIN_LEVEL};
pub use event::{ActivityCompletionEvent, parse_local_timestamp};
pub use date::{date_key, parse_date_key, DATE_KEY_FORMAT};

pub use config::{EvermoreConfig, CatalogConfig};
pub use error::{Error, Result};

/// Timestamp type, offset-aware so the couple's local calendar survives storage.
pub type Time = chrono::DateTime<chrono::FixedOffset>;
