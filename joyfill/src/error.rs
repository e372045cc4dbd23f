//! Error types for this crate.
//!
//! Collaborators and model loading return [`Result<T>`], which uses [`PipelineError`].
//! Suggestion requests fail with [`SuggestError`], the two-way split a transport layer
//! maps onto a status code.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`PipelineError`] as the error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// A [`Result`](std::result::Result) alias for suggestion requests.
pub type SuggestResult<T> = std::result::Result<T, SuggestError>;

/// Failure inside a model collaborator or while loading one.
///
/// # Example
///
/// ```rust,no_run
/// use joyfill::error::PipelineError;
///
/// fn handle_error(e: PipelineError) {
///     match &e {
///         PipelineError::Download(_) => {
///             // Network issue - retry with backoff
///         }
///         PipelineError::Device(_) => {
///             // GPU unavailable - fall back to CPU
///         }
///         PipelineError::Inference(_) | PipelineError::Tokenization(_) => {
///             // Model could not score this input
///         }
///         _ => eprintln!("Internal error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// Network or download failure. Retry may help.
    #[error("{0}")]
    Download(String),

    /// Tokenization failure.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// The model ran but could not produce an answer for this input.
    #[error("{0}")]
    Inference(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl From<hf_hub::api::sync::ApiError> for PipelineError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        PipelineError::Download(format!("HuggingFace API error: {}", value))
    }
}

impl From<candle_core::Error> for PipelineError {
    fn from(value: candle_core::Error) -> Self {
        PipelineError::Inference(value.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

/// Why a suggestion request produced no list.
///
/// ```rust
/// use joyfill::error::SuggestError;
///
/// let err = SuggestError::InvalidFormat("no <blank> placeholder".into());
/// assert!(err.is_client_error());
/// assert_eq!(err.status_code(), 400);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    /// The input has no usable single `<blank>` with a word next to it. Never retried.
    #[error("invalid input: {0}")]
    InvalidFormat(String),

    /// A model collaborator failed, raised or did not answer in time.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
}

impl SuggestError {
    /// `true` when the caller's input caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SuggestError::InvalidFormat(_))
    }

    /// HTTP status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            SuggestError::InvalidFormat(_) => 400,
            SuggestError::ModelUnavailable(_) => 503,
        }
    }
}

impl From<PipelineError> for SuggestError {
    fn from(value: PipelineError) -> Self {
        SuggestError::ModelUnavailable(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_errors_become_server_errors() {
        let err: SuggestError = PipelineError::Inference("nan logits".into()).into();
        assert_eq!(err, SuggestError::ModelUnavailable("nan logits".into()));
        assert!(!err.is_client_error());
        assert_eq!(err.status_code(), 503);
    }
}
