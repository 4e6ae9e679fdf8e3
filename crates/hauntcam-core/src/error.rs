//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every externally visible failure carries one of these kinds together with a
/// human-readable message. Structured-output parse failures are deliberately
/// absent: decoders fall back to a conservative value instead of erroring.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A game, photo, chapter, or scenario row was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// The operation is not allowed in the game's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The request carried malformed or out-of-range values.
    #[error("validation error: {0}")]
    Validation(String),

    /// The generative call returned no usable payload (for example no image).
    #[error("generation failed: {0}")]
    UpstreamGeneration(String),

    /// The generative service could not be reached or answered with an error.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a [`DomainError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable kind, used for HTTP bodies and log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidState(_) => "invalid_state",
            Self::Validation(_) => "validation_error",
            Self::UpstreamGeneration(_) => "upstream_generation_failure",
            Self::Upstream(_) => "upstream_error",
            Self::Infrastructure(_) => "infrastructure_error",
        }
    }
}
