//! Error types for the replay engine.
//!
//! Every variant here is fatal to a run: it means the rules document or
//! the catalog it carries is malformed. Self-correcting conditions
//! (clamped stages, clamped health, missing translations) never surface
//! as errors.

use thiserror::Error;

/// Main error type for pizzapets_core operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An item carries an effect name the resolver does not know
    #[error("unknown effect {0}!")]
    UnknownEffect(String),

    /// A `health_increment` value that is neither numeric nor "max"
    #[error("invalid health increment value {0}!")]
    InvalidHealthIncrement(String),

    /// The pet's type is absent from the configuration
    #[error("\"{0}\" not found in configuration!")]
    MissingType(String),

    /// A named fingerprint slice is absent from `locations`
    #[error("location \"{0}\" not found in configuration!")]
    MissingLocation(String),

    /// A catalog key or reject mask that is not a hexadecimal bitmask
    #[error("invalid hex mask \"{0}\"")]
    InvalidHex(String),

    /// Structural problems found while compiling the rules document
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Errors raised by the data-source collaborator
    #[error("Source error: {0}")]
    Source(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<EngineError>,
    },
}

/// Result type alias for pizzapets_core operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid_configuration<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new source error.
    #[must_use]
    pub fn source_error<S: Into<String>>(msg: S) -> Self {
        Self::Source(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
