//! Validated name newtypes
//!
//! Clans and worlds are referenced by name only. A territory never holds a
//! live handle to a clan; the clan registry is owned elsewhere.
//!
//! Both names are:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for name fields
const MAX_NAME_LENGTH: usize = 64;

fn validated(kind: &str, name: String) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} name cannot be empty", kind)));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "{} name cannot exceed {} characters",
            kind, MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// ClanName
// ============================================================================

/// A validated clan name (non-empty, <=64 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClanName(String);

impl ClanName {
    /// Create a new validated clan name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty after trimming
    /// or longer than 64 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated("Clan", name.into()).map(Self)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClanName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ClanName> for String {
    fn from(name: ClanName) -> String {
        name.0
    }
}

// ============================================================================
// WorldName
// ============================================================================

/// A validated world name (non-empty, <=64 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorldName(String);

impl WorldName {
    /// Create a new validated world name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty after trimming
    /// or longer than 64 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated("World", name.into()).map(Self)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WorldName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<WorldName> for String {
    fn from(name: WorldName) -> String {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod clan_name {
        use super::*;

        #[test]
        fn valid_name() {
            let name = ClanName::new("Axis").unwrap();
            assert_eq!(name.as_str(), "Axis");
            assert_eq!(name.to_string(), "Axis");
        }

        #[test]
        fn empty_name_rejected() {
            let err = ClanName::new("").unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            assert!(err.to_string().contains("cannot be empty"));
        }

        #[test]
        fn whitespace_only_rejected() {
            assert!(ClanName::new("   ").is_err());
        }

        #[test]
        fn name_is_trimmed() {
            let name = ClanName::new("  Iron Wolves  ").unwrap();
            assert_eq!(name.as_str(), "Iron Wolves");
        }

        #[test]
        fn too_long_rejected() {
            assert!(ClanName::new("a".repeat(65)).is_err());
            assert!(ClanName::new("a".repeat(64)).is_ok());
        }

        #[test]
        fn deserialization_validates() {
            let result: Result<ClanName, _> = serde_json::from_str("\"\"");
            assert!(result.is_err());
        }
    }

    mod world_name {
        use super::*;

        #[test]
        fn valid_name() {
            let name = WorldName::new("world_nether").unwrap();
            assert_eq!(name.as_str(), "world_nether");
        }

        #[test]
        fn empty_name_rejected() {
            assert!(WorldName::new("").is_err());
        }

        #[test]
        fn serde_roundtrip_is_plain_string() {
            let name = WorldName::new("world").unwrap();
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, "\"world\"");
            let back: WorldName = serde_json::from_str(&json).unwrap();
            assert_eq!(back, name);
        }
    }
}
