use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Issue supplier error: {0}")]
    Supplier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Issue '{id}' has negative story points ({points})")]
    NegativeStoryPoints { id: String, points: f64 },

    #[error("Issue '{0}' is closed but has no closedAt timestamp")]
    MissingClosedAt(String),

    #[error("Issue '{0}' is open but carries a closedAt timestamp")]
    UnexpectedClosedAt(String),

    #[error("Issue '{0}' was closed before it was created")]
    ClosedBeforeCreated(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}
