use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("notification transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification endpoint rejected the payload with status {status}")]
    Rejected { status: u16 },
    #[error("no async runtime available to deliver the notification")]
    NoRuntime,
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::Transport(_) | DispatchError::Rejected { .. } => ErrorCode::Transport,
            DispatchError::NoRuntime => ErrorCode::Internal,
        }
    }
}
