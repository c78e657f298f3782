use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("data layer request failed: {0}")]
    Gateway(String),
    #[error("failed to read seed file: {0}")]
    SeedRead(std::io::Error),
    #[error("failed to parse seed file: {0}")]
    SeedParse(serde_json::Error),
    #[error("failed to serialize directory snapshot: {0}")]
    Serialization(serde_json::Error),
}

pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;
