use thiserror::Error;

#[derive(Debug, Error)]
pub enum K8sError {
    #[error("job submission rejected: {0}")]
    Submission(String),

    #[error("kubernetes api error: {0}")]
    Api(#[from] kube::Error),

    #[error("invalid job request: {0}")]
    InvalidRequest(#[from] krex_model::ModelError),

    #[error("no pod found with prefix '{prefix}' in namespace '{namespace}'")]
    PodNotFound { prefix: String, namespace: String },

    #[error("copy from pod failed: {output}")]
    Copy { output: String },

    #[error("operation canceled")]
    Canceled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
