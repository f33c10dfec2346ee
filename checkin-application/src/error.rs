use checkin_domain::{DeviceError, InvalidTransition, TransitionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("device unavailable: {0}")]
    DeviceUnavailable(DeviceError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<TransitionError> for AppError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::UnknownIdentifier(identifier) => {
                AppError::NotFound(format!("record '{}'", identifier))
            }
            err @ TransitionError::AlreadyPresent { .. } => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<InvalidTransition> for AppError {
    fn from(value: InvalidTransition) -> Self {
        AppError::Conflict(value.to_string())
    }
}
