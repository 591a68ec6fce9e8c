use thiserror::Error;

use cashshop_application::AppError;

#[derive(Debug, Error)]
pub enum ConsumerError {
    /// The payload could not be decoded; redelivery will not help.
    #[error("malformed message: {0}")]
    Malformed(String),
    /// The workflow refused the command and already answered with an error
    /// event.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AppError> for ConsumerError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::BadRequest(msg) => ConsumerError::Malformed(msg),
            AppError::Workflow(err) if err.is_business() => ConsumerError::Rejected(err.to_string()),
            AppError::Workflow(err) => ConsumerError::Internal(format!("{:?}", err)),
            AppError::Internal(err) => ConsumerError::Internal(format!("{:?}", err)),
        }
    }
}
