use serde::{Deserialize, Serialize};

use crate::{
    EnvBindings, JobName, RestartPolicy, Volume, VolumeMount,
    error::{ModelError, ModelResult},
};

/// Declarative description of one batch job to submit.
///
/// `JobRequest` describes *what* the cluster should run: a single container
/// with its command, environment bindings and volume mounts, plus the
/// lifecycle knobs the job controller needs (restart policy, retry budget,
/// post-completion TTL).
///
/// A request is immutable once built and consumed exactly once at
/// submission; callers needing a second submission build a fresh request so
/// the generated name stays unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    /// Target namespace the job resource is created in.
    pub namespace: String,
    /// Unique job name, normally produced by [`JobName::generate`].
    pub name: JobName,
    /// Name of the single container.
    pub container_name: String,
    /// Container image reference.
    pub image: String,
    /// Container entrypoint.
    pub command: Vec<String>,
    /// Arguments passed to the entrypoint.
    pub args: Vec<String>,
    /// Environment bindings (literals and secret references).
    #[serde(default, skip_serializing_if = "EnvBindings::is_empty")]
    pub env: EnvBindings,
    /// Volume mounts of the container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<VolumeMount>,
    /// Pod volumes referenced by the mounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    /// Pod restart policy.
    pub restart: RestartPolicy,
    /// Number of controller-level retries before the job is marked failed.
    pub backoff_limit: i32,
    /// Seconds the finished job is kept before automatic deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds_after_finished: Option<i32>,
}

impl JobRequest {
    /// Validate the request before submission.
    ///
    /// Rules:
    /// - `namespace`, `image` and `container_name` are non-empty,
    /// - `command` has at least one non-empty element,
    /// - every mount refers to a declared volume.
    ///
    /// Payload-level values (collection names, bucket keys) are deliberately
    /// not inspected; malformed ones surface as a downstream job failure.
    pub fn validate(&self) -> ModelResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(ModelError::MissingField("namespace"));
        }
        if self.image.trim().is_empty() {
            return Err(ModelError::MissingField("image"));
        }
        if self.container_name.trim().is_empty() {
            return Err(ModelError::MissingField("containerName"));
        }
        if self.command.iter().all(|c| c.trim().is_empty()) {
            return Err(ModelError::MissingField("command"));
        }
        for mount in &self.mounts {
            if !self.volumes.iter().any(|v| v.name == mount.name) {
                return Err(ModelError::Invalid(format!(
                    "mount '{}' has no matching volume",
                    mount.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::JobRequest;
    use crate::{EnvBindings, JobName, RestartPolicy, Volume, VolumeMount};

    fn request() -> JobRequest {
        JobRequest {
            namespace: "default".into(),
            name: JobName::new("prom-s3-abcd1234"),
            container_name: "prom-snap".into(),
            image: "richarvey/awscli:latest".into(),
            command: vec!["sh".into(), "-c".into()],
            args: vec!["echo ok".into()],
            env: EnvBindings::new(),
            mounts: vec![],
            volumes: vec![],
            restart: RestartPolicy::Never,
            backoff_limit: 4,
            ttl_seconds_after_finished: Some(120),
        }
    }

    #[test]
    fn valid_request_passes_validation() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let mut req = request();
        req.namespace = "  ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut req = request();
        req.command = vec![String::new()];
        assert!(req.validate().is_err());
    }

    #[test]
    fn mount_without_volume_is_rejected() {
        let mut req = request();
        req.mounts = vec![VolumeMount::new("data", "/data", false)];
        assert!(req.validate().is_err());

        req.volumes = vec![Volume::persistent_volume_claim("data", "claim")];
        assert!(req.validate().is_ok());
    }

    #[test]
    fn serde_roundtrip_json() {
        let req = request();
        let json = serde_json::to_string(&req).unwrap();

        assert!(json.contains("\"backoffLimit\":4"));
        assert!(json.contains("\"ttlSecondsAfterFinished\":120"));

        let back: JobRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }
}
