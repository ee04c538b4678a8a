use thiserror::Error;

/// Startup and serving failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database unavailable: {0}")]
    Database(#[from] shared::error::AppError),
}

pub type Result<T> = std::result::Result<T, ServerError>;
