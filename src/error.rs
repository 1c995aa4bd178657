use thiserror::Error;

/// Boxed error returned by environment implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for DDPG operations
pub type Result<T> = std::result::Result<T, DdpgError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum DdpgError {
    /// Vector or matrix width does not match the configured dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Stacking or training on a batch with no transitions
    #[error("Empty batch")]
    EmptyBatch,

    /// Training error
    #[error("Training error: {0}")]
    TrainingError(String),

    /// Failure raised by the environment, passed through as-is
    #[error(transparent)]
    Environment(BoxError),

    /// Configuration (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors (config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper functions for common error patterns
impl DdpgError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DdpgError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DdpgError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Checks a vector width against the configured dimension.
    pub(crate) fn check_width(what: &str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(DdpgError::dimension_mismatch(
                format!("{} of width {}", what, expected),
                format!("width {}", actual),
            ))
        }
    }
}
