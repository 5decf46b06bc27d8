//! Identity types for PayTaka
//!
//! Request and catalog identifiers are strongly typed wrappers around UUIDs
//! to prevent accidental mixing of different ID types. Accounts are keyed by
//! phone number, and mobile operators carry short human-assigned codes, so
//! those two are string-backed instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse from a string (with or without prefix)
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                let s = s.strip_prefix(concat!($prefix, "_")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

// Request identity types
define_id_type!(DepositId, "dep", "Unique identifier for a deposit request");
define_id_type!(RechargeId, "rcg", "Unique identifier for a recharge request");
define_id_type!(PackageRequestId, "pkg", "Unique identifier for a package purchase request");
define_id_type!(OrderId, "ord", "Unique identifier for a shop order");

// Catalog identity types
define_id_type!(OfferId, "offer", "Unique identifier for a catalog offer");
define_id_type!(ProductId, "prod", "Unique identifier for a shop product");

/// Subscriber phone number - the unique key for an account
///
/// Also used for recharge targets and package recipients, which are not
/// required to be registered accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Phone(pub String);

impl Phone {
    pub fn new(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Phone {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Mobile network operator identifier (e.g., "gp", "robi")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorId(pub String);

impl OperatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OperatorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        let id = DepositId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("dep_"));

        let parsed = DepositId::parse(&shown).unwrap();
        assert_eq!(parsed, id);

        // Bare UUID parses too
        let bare = DepositId::parse(&id.0.to_string()).unwrap();
        assert_eq!(bare, id);
    }

    #[test]
    fn test_phone_equality() {
        let a = Phone::new("01712345678");
        let b = Phone::from("01712345678");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "01712345678");
    }
}
