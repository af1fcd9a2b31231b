use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown admission category `{0}`")]
    UnknownCategory(String),
    #[error("student rank must be a positive integer (got {0})")]
    InvalidRank(u32),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog JSON")]
    Parse(#[from] serde_json::Error),
}
