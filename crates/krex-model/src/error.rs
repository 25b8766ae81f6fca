use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("unknown restart policy: {0}")]
    UnknownRestartPolicy(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
