use texture_compositor::CompositorError;
use thiserror::Error;

/// Rejected form input. Reported before anything is submitted.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    #[error("'{0}' is required")]
    MissingField(&'static str),
    #[error("quantity must be at least 1")]
    Quantity,
    #[error("image scale {0} is outside (0, 4]")]
    Scale(f32),
}

/// Failures of session operations driven by the host page.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid form: {0}")]
    InvalidForm(#[from] FormError),
    #[error("unknown or inactive colour '{0}'")]
    UnknownColor(String),
    #[error("composite is not ready yet")]
    CompositeNotReady,
    #[error("could not encode composite: {0}")]
    Encode(String),
    #[error(transparent)]
    Compositor(#[from] CompositorError),
}

/// Design submission rejected by the persistence backend.
///
/// The session is left untouched, so resubmitting sends the same data.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct UploadSubmissionFailure {
    pub message: String,
    pub retryable: bool,
}

impl UploadSubmissionFailure {
    pub fn retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DesignFetchError {
    #[error("design '{0}' not found")]
    NotFound(String),
    #[error("design store unreachable: {0}")]
    Unreachable(String),
}
