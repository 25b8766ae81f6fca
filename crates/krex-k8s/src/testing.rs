//! Scripted in-memory [`JobClient`] for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use krex_model::JobRequest;

use crate::{
    K8sError,
    client::{JobClient, JobCondition, JobHandle},
};

/// In-memory client with a scripted condition sequence.
///
/// `job_conditions` walks the script one entry per call and sticks at the
/// last entry; an empty script reports no conditions forever. Submitted
/// requests are recorded for assertions.
#[derive(Default)]
pub struct MockJobClient {
    pods: Vec<String>,
    script: Mutex<ScriptState>,
    created: Mutex<Vec<JobRequest>>,
    submission_error: Option<String>,
}

#[derive(Default)]
struct ScriptState {
    batches: Vec<Vec<JobCondition>>,
    next: usize,
}

impl MockJobClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pod names returned by `list_pod_names`.
    pub fn with_pods(mut self, pods: Vec<String>) -> Self {
        self.pods = pods;
        self
    }

    /// Set the condition batches returned by successive `job_conditions` calls.
    pub fn with_condition_script(self, batches: Vec<Vec<JobCondition>>) -> Self {
        *self.script.lock().unwrap() = ScriptState { batches, next: 0 };
        self
    }

    /// Make `create_job` fail with the given rejection message.
    pub fn with_submission_error(mut self, message: impl Into<String>) -> Self {
        self.submission_error = Some(message.into());
        self
    }

    /// Requests submitted so far.
    pub fn created_jobs(&self) -> Vec<JobRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobClient for MockJobClient {
    async fn create_job(&self, request: &JobRequest) -> Result<JobHandle, K8sError> {
        if let Some(message) = &self.submission_error {
            return Err(K8sError::Submission(message.clone()));
        }
        request.validate()?;
        self.created.lock().unwrap().push(request.clone());
        Ok(JobHandle {
            namespace: request.namespace.clone(),
            name: request.name.as_str().to_string(),
        })
    }

    async fn job_conditions(&self, _handle: &JobHandle) -> Result<Vec<JobCondition>, K8sError> {
        let mut state = self.script.lock().unwrap();
        if state.batches.is_empty() {
            return Ok(Vec::new());
        }
        let idx = state.next.min(state.batches.len() - 1);
        state.next += 1;
        Ok(state.batches[idx].clone())
    }

    async fn list_pod_names(&self, _namespace: &str) -> Result<Vec<String>, K8sError> {
        Ok(self.pods.clone())
    }
}
