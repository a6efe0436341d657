//! Validation errors for configuration aggregates.
//!
//! Each variant names the invariant that was violated so it can be surfaced
//! verbatim to the web client.

use thiserror::Error;

/// A result type using `ValidationError`.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A configuration aggregate violated one of its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// More lights than the panel can hold.
    #[error("too many lights: {count} configured, at most {max} allowed")]
    TooManyLights {
        /// Number of lights in the rejected aggregate.
        count: usize,
        /// The configured maximum.
        max: usize,
    },

    /// A light id is not of the form `<domain>.<name>`.
    #[error("light {index}: invalid entity id '{id}' (expected <domain>.<name> using A-Z, a-z, 0-9, _)")]
    InvalidLightId {
        /// Position of the light in the list.
        index: usize,
        /// The offending id.
        id: String,
    },

    /// A light has an empty display name.
    #[error("light {index}: label must not be empty")]
    EmptyDisplayName {
        /// Position of the light in the list.
        index: usize,
    },

    /// A light's display name is too long to fit on a tile.
    #[error("light {index}: label is {len} characters, at most {max} allowed")]
    DisplayNameTooLong {
        /// Position of the light in the list.
        index: usize,
        /// Length of the rejected label in characters.
        len: usize,
        /// The configured maximum.
        max: usize,
    },
}

impl ValidationError {
    /// Short machine-readable code for the violated invariant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TooManyLights { .. } => "too_many_lights",
            Self::InvalidLightId { .. } => "invalid_entity_id",
            Self::EmptyDisplayName { .. } => "empty_label",
            Self::DisplayNameTooLong { .. } => "label_too_long",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_invariant() {
        let err = ValidationError::TooManyLights { count: 17, max: 16 };
        assert_eq!(
            err.to_string(),
            "too many lights: 17 configured, at most 16 allowed"
        );

        let err = ValidationError::InvalidLightId {
            index: 2,
            id: "kitchen".into(),
        };
        assert!(err.to_string().contains("'kitchen'"));
        assert_eq!(err.code(), "invalid_entity_id");
    }
}
