/// Convenience result type used across layersplit.
pub type SplitResult<T> = Result<T, SplitError>;

/// Top-level error taxonomy used by the split APIs.
#[derive(thiserror::Error, Debug)]
pub enum SplitError {
    /// Invalid options or buffer dimensions.
    #[error("validation error: {0}")]
    Validation(String),

    /// The source image could not be read or decoded.
    #[error("image decode error: {0}")]
    Decode(String),

    /// An output layer could not be encoded or written.
    #[error("image encode error: {0}")]
    Encode(String),

    /// Failures inside the per-pixel search or the scan bookkeeping.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SplitError {
    /// Build a [`SplitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SplitError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SplitError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SplitError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
