use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, Client, ResourceExt,
    api::{ListParams, PostParams},
};
use tracing::{debug, info};

use krex_model::JobRequest;

use crate::{K8sError, convert::to_k8s_job};

/// Condition type reported once the job has run to completion.
pub const CONDITION_COMPLETE: &str = "Complete";
/// Condition type reported once the job has exhausted its retry budget.
pub const CONDITION_FAILED: &str = "Failed";

/// Opaque reference to a submitted job.
///
/// Carries just enough to re-query status and to print user-facing log
/// hints (`kubectl logs -n {namespace} job/{name}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub namespace: String,
    pub name: String,
}

/// One named lifecycle condition of a job, as reported by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCondition {
    /// Condition name, e.g. `Complete` or `Failed`.
    pub type_: String,
    /// Boolean-like state: `"True"`, `"False"` or `"Unknown"`.
    pub status: String,
    /// Optional human-readable message attached by the controller.
    pub message: Option<String>,
}

impl JobCondition {
    /// Whether this condition has the given type and a `"True"` status.
    pub fn is_true(&self, type_: &str) -> bool {
        self.type_ == type_ && self.status == "True"
    }
}

/// Minimal orchestration API surface the export pipelines need.
///
/// Kept as a trait so pipelines and the poll loop can be exercised against
/// a scripted in-memory client (see [`crate::testing`]).
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Submit the job description; returns a handle for status re-queries.
    ///
    /// Rejections by the orchestration API surface as
    /// [`K8sError::Submission`] with the API message propagated verbatim.
    async fn create_job(&self, request: &JobRequest) -> Result<JobHandle, K8sError>;

    /// Re-read the job's current conditions.
    async fn job_conditions(&self, handle: &JobHandle) -> Result<Vec<JobCondition>, K8sError>;

    /// List pod names in a namespace.
    async fn list_pod_names(&self, namespace: &str) -> Result<Vec<String>, K8sError>;
}

/// [`JobClient`] backed by a real cluster connection.
#[derive(Clone)]
pub struct KubeJobClient {
    client: Client,
}

impl KubeJobClient {
    /// Connect using the ambient kubeconfig / in-cluster configuration.
    pub async fn from_default_config() -> Result<Self, K8sError> {
        let client = Client::try_default().await?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobClient for KubeJobClient {
    async fn create_job(&self, request: &JobRequest) -> Result<JobHandle, K8sError> {
        request.validate()?;
        let job = to_k8s_job(request);

        let jobs: Api<Job> = Api::namespaced(self.client.clone(), &request.namespace);
        let created = jobs
            .create(&PostParams::default(), &job)
            .await
            .map_err(|e| K8sError::Submission(e.to_string()))?;

        let handle = JobHandle {
            namespace: request.namespace.clone(),
            name: created.name_any(),
        };
        info!(job = %handle.name, namespace = %handle.namespace, "job created");
        Ok(handle)
    }

    async fn job_conditions(&self, handle: &JobHandle) -> Result<Vec<JobCondition>, K8sError> {
        let jobs: Api<Job> = Api::namespaced(self.client.clone(), &handle.namespace);
        let job = jobs.get_status(&handle.name).await?;

        let conditions = job
            .status
            .and_then(|s| s.conditions)
            .unwrap_or_default()
            .into_iter()
            .map(|c| JobCondition {
                type_: c.type_,
                status: c.status,
                message: c.message,
            })
            .collect::<Vec<_>>();

        debug!(job = %handle.name, count = conditions.len(), "refreshed job conditions");
        Ok(conditions)
    }

    async fn list_pod_names(&self, namespace: &str) -> Result<Vec<String>, K8sError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(|p| p.name_any()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::JobCondition;

    fn condition(type_: &str, status: &str) -> JobCondition {
        JobCondition {
            type_: type_.into(),
            status: status.into(),
            message: None,
        }
    }

    #[test]
    fn is_true_requires_matching_type_and_true_status() {
        assert!(condition("Complete", "True").is_true("Complete"));
        assert!(!condition("Complete", "False").is_true("Complete"));
        assert!(!condition("Complete", "Unknown").is_true("Complete"));
        assert!(!condition("Failed", "True").is_true("Complete"));
    }
}
