use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Model(#[from] krex_model::ModelError),

    #[error(transparent)]
    K8s(#[from] krex_k8s::K8sError),

    #[error(transparent)]
    Store(#[from] krex_store::StoreError),

    #[error("archive creation failed: {0}")]
    Archive(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
