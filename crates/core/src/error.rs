//! Error taxonomy shared by every Evermore crate.

use crate::activity::ActivityKind;

/// Result type used across Evermore.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// No catalog entry (or wire name) matches the activity kind.
    #[error("Unknown activity kind: {0}")]
    UnknownActivityKind(String),

    /// The activity is already marked complete for the current period.
    #[error("Activity already completed: {0}")]
    AlreadyCompleted(ActivityKind),

    /// Year/month/day does not name a real calendar period.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// A completion event could not be interpreted.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// The activity catalog or configuration is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A collaborator (store, history source) could not be reached.
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),
}

impl Error {
    /// Whether the error comes from collaborator I/O rather than the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::TransportUnavailable(_))
    }
}
