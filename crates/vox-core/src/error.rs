//! # Error Hierarchy
//!
//! Validation errors for the domain-primitive newtypes in this crate.
//! Each variant carries the rejected input so that a misconfigured seed file
//! or a malformed API payload can be diagnosed without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Record identifiers must contain at least one non-whitespace character.
    #[error("invalid record ID: must be non-empty")]
    EmptyRecordId,

    /// Acting user names must contain at least one non-whitespace character.
    #[error("invalid actor: must be non-empty")]
    EmptyActor,

    /// Timestamp string is not valid RFC 3339.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A string did not name any member of a closed enum.
    #[error("unknown {kind}: \"{value}\" (expected one of: {expected})")]
    UnknownVariant {
        /// Name of the enum, e.g. `dispute status`.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Comma-separated list of accepted values.
        expected: String,
    },
}

impl ValidationError {
    /// Build an [`ValidationError::UnknownVariant`] from the accepted wire names.
    pub fn unknown_variant(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_lists_expected_values() {
        let err = ValidationError::unknown_variant("dispute status", "lost", &["open", "closed"]);
        let msg = err.to_string();
        assert!(msg.contains("dispute status"));
        assert!(msg.contains("\"lost\""));
        assert!(msg.contains("open, closed"));
    }

    #[test]
    fn invalid_timestamp_display() {
        let err = ValidationError::InvalidTimestamp {
            value: "yesterday".into(),
            reason: "not RFC 3339".into(),
        };
        assert!(err.to_string().contains("yesterday"));
    }
}
