//! Error types for entity matching and reconciliation

use thiserror::Error;

/// Errors raised by the matching core.
///
/// "No match" is an expected outcome and normally travels as
/// [`MatchResult::NoMatch`](crate::matching::MatchResult); it only becomes
/// [`MatchError::NoMatchFound`] when a caller asks for a match to be present.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// The query had no candidate above the acceptance threshold
    #[error("no match found for '{name}': {reason}")]
    NoMatchFound { name: String, reason: String },

    /// Name cannot be split into a first token and a remainder
    #[error("malformed name '{0}': expected 'First Last' or 'F.Last'")]
    MalformedName(String),

    /// Two records in the candidate pool share an identifier
    #[error("duplicate entity identifier: {0}")]
    DuplicateIdentifier(String),

    /// Matcher thresholds out of range or inverted
    #[error("invalid thresholds: accept {accept} / disambiguation {disambiguation}")]
    InvalidThreshold { accept: f64, disambiguation: f64 },

    /// Category or team-code table could not be loaded
    #[error("mapping table error: {0}")]
    Mapping(String),
}

/// Result type for matching operations
pub type CoreResult<T> = Result<T, MatchError>;
