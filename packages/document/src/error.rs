use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate item id: {0}")]
    DuplicateId(String),

    #[error("Item in zone {zone} at index {index} has no id")]
    MissingId { zone: String, index: usize },
}

pub type DocumentResult<T> = Result<T, DocumentError>;
