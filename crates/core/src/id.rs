//! Identifiers for Evermore entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Identifier for a couple.
///
/// Couple ids arrive from outside (accounts, links, demo fixtures) so any
/// non-empty string is accepted; freshly created couples get a ULID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoupleId(String);

impl CoupleId {
    /// Wrap an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, ULID-backed id.
    pub fn generate() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can be used as a storage key (no path separators,
    /// not empty, no leading dot).
    pub fn is_storage_safe(&self) -> bool {
        !self.0.is_empty()
            && !self.0.starts_with('.')
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl std::fmt::Display for CoupleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for CoupleId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_safe() {
        let a = CoupleId::generate();
        let b = CoupleId::generate();
        assert_ne!(a, b);
        assert!(a.is_storage_safe());
        assert_eq!(a.as_str().len(), 26);
    }

    #[test]
    fn test_storage_safety() {
        assert!(CoupleId::new("demo-couple-123").is_storage_safe());
        assert!(!CoupleId::new("").is_storage_safe());
        assert!(!CoupleId::new("../etc").is_storage_safe());
        assert!(!CoupleId::new(".hidden").is_storage_safe());
        assert!(!CoupleId::new("a/b").is_storage_safe());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = CoupleId::new("demo-couple-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"demo-couple-123\"");
    }
}
