use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DriveResult<T> = Result<T, DriveError>;
