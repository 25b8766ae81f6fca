use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("credential resolution failed: {0}")]
    Credential(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
