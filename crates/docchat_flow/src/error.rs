use docchat_client::ApiError;
use thiserror::Error;

/// Local input the flows refuse before any request is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload exactly one PDF file (received {0})")]
    FileCount(usize),

    #[error("Please upload a PDF file")]
    NotPdf { media_type: String },

    #[error("PDF files are limited to {max} bytes (received {size})")]
    TooLarge { size: u64, max: u64 },

    #[error("Message is empty")]
    EmptyMessage,
}

/// Everything that can end a single upload or send.
///
/// None of these are fatal: the flow that produced one is already back in
/// its stable state when the caller sees it.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Request failed: {0}")]
    Transport(#[source] ApiError),

    #[error("Unexpected response: {0}")]
    Protocol(#[source] ApiError),
}

impl From<ApiError> for FlowError {
    fn from(err: ApiError) -> Self {
        if err.is_protocol() {
            Self::Protocol(err)
        } else {
            Self::Transport(err)
        }
    }
}

impl FlowError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
