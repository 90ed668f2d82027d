use thiserror::Error;

pub type Result<T> = std::result::Result<T, SubmitError>;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("API rejected submission with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("API request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SubmitError {
    /// Server errors, throttling and network failures are worth another try.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout { .. } | Self::Transport(_) => true,
            Self::Encode(_) => false,
        }
    }
}
