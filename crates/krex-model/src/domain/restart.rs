use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Pod restart policy of a batch job.
///
/// Batch workloads only allow `Never` and `OnFailure`; retries beyond that
/// are governed by the job's backoff limit, not by the pod itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Failed containers are not restarted in place; the job controller
    /// creates replacement pods up to the backoff limit.
    Never,
    /// Failed containers are restarted inside the same pod.
    OnFailure,
}

impl RestartPolicy {
    /// Wire value as expected by the orchestration API.
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Never => "Never",
            RestartPolicy::OnFailure => "OnFailure",
        }
    }
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self::Never
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestartPolicy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Never" => Ok(Self::Never),
            "OnFailure" => Ok(Self::OnFailure),
            other => Err(ModelError::UnknownRestartPolicy(other.to_string())),
        }
    }
}
