use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Server not found")]
    ServerNotFound,

    #[error("Server URL not found")]
    UrlNotFound,

    #[error("Server folder not found")]
    FolderNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Task not found")]
    TaskNotFound,

    #[error("A scan is already running for this server")]
    ScanAlreadyRunning,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::ServerNotFound
            | ServiceError::UrlNotFound
            | ServiceError::FolderNotFound
            | ServiceError::UserNotFound
            | ServiceError::TaskNotFound => AppError::NotFound(anyhow::anyhow!(err.to_string())),
            ServiceError::ScanAlreadyRunning => {
                AppError::Conflict(anyhow::anyhow!(err.to_string()))
            }
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
