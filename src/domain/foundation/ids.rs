//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Opaque identifier for a real-time connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Creates a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a connection ID from an existing string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user, as carried by a credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Defines a prefixed, sequence-numbered catalog identifier (`R001`, `KPI001`).
macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Builds the identifier for a 1-based sequence number.
            pub fn from_sequence(n: u32) -> Self {
                Self(format!("{}{:03}", $prefix, n))
            }

            /// Wraps an identifier received from a client or a path segment.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Sequence number, when the identifier follows the catalog format.
            pub fn sequence(&self) -> Option<u32> {
                self.0.strip_prefix($prefix)?.parse().ok()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a register risk.
    RiskId,
    "R"
);
catalog_id!(
    /// Identifier of a key performance indicator.
    KpiId,
    "KPI"
);
catalog_id!(
    /// Identifier of a key risk indicator.
    KriId,
    "KRI"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn connection_id_display_is_uuid() {
        let display = format!("{}", ConnectionId::new());
        assert_eq!(display.len(), 36);
    }

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn risk_id_pads_sequence() {
        assert_eq!(RiskId::from_sequence(7).as_str(), "R007");
        assert_eq!(RiskId::from_sequence(1234).as_str(), "R1234");
    }

    #[test]
    fn sequence_parses_catalog_format_only() {
        assert_eq!(RiskId::new("R042").sequence(), Some(42));
        assert_eq!(RiskId::new("risk-42").sequence(), None);
        assert_eq!(KriId::from_sequence(3).sequence(), Some(3));
    }
}
