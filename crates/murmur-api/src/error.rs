use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("invalid status identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("sharer username must not be empty")]
    EmptyUsername,

    /// Store failures propagate as-is; nothing here retries.
    #[error("share store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl ShareError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ShareError::InvalidIdentifier(_) | ShareError::EmptyUsername => StatusCode::BAD_REQUEST,
            ShareError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("account {0} was not found")]
    AccountNotFound(String),

    #[error("account {0} is not activated")]
    AccountNotActivated(String),

    #[error("account repository failure: {0}")]
    Repository(#[from] anyhow::Error),
}

impl AuthError {
    /// Both refusal kinds map to 401.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AccountNotFound(_) | AuthError::AccountNotActivated(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
