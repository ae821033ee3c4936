//! Error types for the domain layer
//!
//! Two families live here:
//! - `DomainError` for value objects that fail validation at construction
//! - `ClaimError`, the closed set of reasons a territory operation is refused
//!
//! Both are returned as values. Nothing in the territory model panics on bad input.

use thiserror::Error;

/// Unified error type for value-object construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for rejected input.
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Clan name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Why a claim, unclaim, or flag operation was refused.
///
/// The set is closed: callers can match exhaustively and every refusal leaves
/// the territory state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    /// The cell already belongs to a clan, or the block already holds a flag
    #[error("Cell or flag block is already claimed")]
    AlreadyClaimed,

    /// The clan holds as many cells as its standing allows
    #[error("Claim limit reached: {current}/{max} cells")]
    LimitReached { current: u32, max: u32 },

    /// The cell does not touch any cell the clan already holds
    #[error("Cell is not adjacent to the clan's territory")]
    NotAdjacent,

    /// The cell is unclaimed or held by another clan, or the location given
    /// for a flag is not inside it
    #[error("Cell is not owned by this clan")]
    NotOwner,

    /// Releasing the cell would split the clan's territory in two
    #[error("Unclaiming this cell would fragment the clan's territory")]
    WouldFragment,

    /// No flag stands at the given location
    #[error("No flag found at that location")]
    FlagNotFound,

    /// The flag is already at the highest tier
    #[error("Flag is already at maximum tier")]
    MaxTierReached,
}

impl ClaimError {
    /// Create a limit reached error
    pub fn limit_reached(current: u32, max: u32) -> Self {
        Self::LimitReached { current, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: name cannot be empty");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("unknown tier: 7");
        assert!(matches!(err, DomainError::Parse(_)));
        assert!(err.to_string().contains("unknown tier"));
    }

    #[test]
    fn test_limit_reached_error() {
        let err = ClaimError::limit_reached(12, 12);
        assert!(matches!(err, ClaimError::LimitReached { .. }));
        assert_eq!(err.to_string(), "Claim limit reached: 12/12 cells");
    }

    #[test]
    fn test_claim_errors_compare_by_value() {
        assert_eq!(ClaimError::WouldFragment, ClaimError::WouldFragment);
        assert_ne!(ClaimError::NotOwner, ClaimError::NotAdjacent);
    }
}
