//! Prometheus data export: a batch job archiving the persistent volume, or
//! a direct pod copy when local mode is requested.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use krex_k8s::{JobClient, WaitOptions, copy_from_pod, pods, wait_for_completion};
use krex_model::{Credentials, JobName, JobRequest, RestartPolicy, Volume, VolumeMount};
use krex_store::upload_file;

use crate::{
    ExportError, ExportOutcome, archive,
    sink::{ExportEvent, ExportSink},
};

/// Image with the storage CLI used by the job-mode backup.
const AWSCLI_IMAGE: &str = "richarvey/awscli:latest";
/// Name prefix identifying the Prometheus pod in local mode.
const POD_PREFIX: &str = "prometheus";
/// Data directory inside the Prometheus pod / persistent volume.
const PROMETHEUS_DATA_PATH: &str = "/prometheus";
/// Claim backing the job-mode volume.
const PVC_CLAIM: &str = "prometheus";
/// Finished jobs are garbage-collected after this many seconds.
const JOB_TTL_SECONDS: i32 = 120;

/// Inputs of one Prometheus backup.
#[derive(Debug, Clone)]
pub struct PromExportRequest {
    /// Namespace holding the Prometheus deployment.
    pub namespace: String,
    /// Backup filename without extension; `.tar.gz` is appended.
    pub filename: String,
    /// Target bucket.
    pub bucket: String,
    /// Optional static credential triple.
    pub credentials: Option<Credentials>,
}

impl PromExportRequest {
    /// Object key the archive is uploaded under.
    pub fn object_key(&self) -> String {
        format!("{}.tar.gz", self.filename)
    }

    /// Build the job description for the persistent-volume backup.
    ///
    /// Only non-empty credential values become environment entries; see
    /// the MongoDB builder for the unfiltered counterpart.
    pub fn build_job(&self) -> JobRequest {
        let env = self
            .credentials
            .as_ref()
            .map(Credentials::env_bindings_filtered)
            .unwrap_or_default();

        let script = format!(
            "tar -czvf /tmp/{filename}.tar.gz {data} && aws s3 cp /tmp/{filename}.tar.gz s3://{bucket}/{filename}.tar.gz",
            filename = self.filename,
            data = PROMETHEUS_DATA_PATH,
            bucket = self.bucket,
        );

        JobRequest {
            namespace: self.namespace.clone(),
            name: JobName::generate("prom-s3"),
            container_name: "prom-snap".into(),
            image: AWSCLI_IMAGE.into(),
            command: vec!["sh".into(), "-c".into()],
            args: vec![script],
            env,
            mounts: vec![VolumeMount::new(
                "prometheus-volume",
                PROMETHEUS_DATA_PATH,
                false,
            )],
            volumes: vec![Volume::persistent_volume_claim(
                "prometheus-volume",
                PVC_CLAIM,
            )],
            restart: RestartPolicy::Never,
            backoff_limit: 4,
            ttl_seconds_after_finished: Some(JOB_TTL_SECONDS),
        }
    }
}

/// Submit the persistent-volume backup job and optionally await completion.
pub async fn run_prometheus_export(
    client: &dyn JobClient,
    request: &PromExportRequest,
    wait: Option<&WaitOptions>,
    cancel: &CancellationToken,
    sink: &dyn ExportSink,
) -> Result<ExportOutcome, ExportError> {
    let job = request.build_job();
    debug!(job = %job.name, filename = %request.filename, "submitting prometheus backup job");

    let handle = client.create_job(&job).await?;
    sink.event(ExportEvent::JobCreated {
        name: handle.name.clone(),
        namespace: handle.namespace.clone(),
    });

    let Some(options) = wait else {
        return Ok(ExportOutcome::Submitted { handle });
    };

    let outcome = wait_for_completion(client, &handle, options, cancel).await?;
    Ok(ExportOutcome::from_wait(handle, outcome))
}

/// Back up Prometheus by copying its data directory out of the pod.
///
/// Pipeline: locate the pod by prefix, copy `/prometheus/` into a scoped
/// temporary directory, archive it as `{filename}.tar.gz`, upload the
/// archive. Every step either completes or raises; the temporary directory
/// is removed on all exit paths.
pub async fn backup_local(
    client: &dyn JobClient,
    request: &PromExportRequest,
    cancel: &CancellationToken,
    sink: &dyn ExportSink,
) -> Result<(), ExportError> {
    backup_local_in(client, request, cancel, sink, &std::env::temp_dir()).await
}

/// Same as [`backup_local`] with an explicit scratch root, for tests that
/// assert the temporary directory does not outlive the run.
pub async fn backup_local_in(
    client: &dyn JobClient,
    request: &PromExportRequest,
    cancel: &CancellationToken,
    sink: &dyn ExportSink,
    scratch_root: &Path,
) -> Result<(), ExportError> {
    let pod = pods::find_pod_by_prefix(client, &request.namespace, POD_PREFIX).await?;
    sink.event(ExportEvent::PodFound { name: pod.clone() });

    // Dropped on every exit path below, including errors.
    let scratch = tempfile::TempDir::new_in(scratch_root)?;
    let local_path = scratch.path().join(&request.filename);

    sink.event(ExportEvent::CopyStarted { pod: pod.clone() });
    copy_from_pod(
        &pod,
        &format!("{PROMETHEUS_DATA_PATH}/"),
        &local_path,
        &request.namespace,
        cancel,
    )
    .await?;
    sink.event(ExportEvent::CopyFinished);

    let archive_path = scratch.path().join(request.object_key());
    archive::create_tar_gz(&local_path, &archive_path, &request.filename).await?;
    sink.event(ExportEvent::ArchiveCreated {
        path: archive_path.clone(),
    });

    upload_file(
        &archive_path,
        &request.bucket,
        &request.object_key(),
        request.credentials.as_ref(),
    )
    .await?;
    sink.event(ExportEvent::Uploaded {
        bucket: request.bucket.clone(),
        key: request.object_key(),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use krex_k8s::K8sError;
    use krex_k8s::testing::MockJobClient;
    use krex_model::{Credentials, ENV_SESSION_TOKEN, EnvValue, VolumeSource};

    use super::{PromExportRequest, backup_local_in};
    use crate::{ExportError, ExportEvent, RecordingSink};

    fn request() -> PromExportRequest {
        PromExportRequest {
            namespace: "monitoring".into(),
            filename: "prometheus-backup".into(),
            bucket: "backups".into(),
            credentials: None,
        }
    }

    #[test]
    fn job_archives_volume_and_uploads_via_storage_cli() {
        let job = request().build_job();
        let script = &job.args[0];

        assert!(job.name.as_str().starts_with("prom-s3-"));
        assert!(script.contains("tar -czvf /tmp/prometheus-backup.tar.gz /prometheus"));
        assert!(script.contains("aws s3 cp"));
        assert!(script.contains("s3://backups/prometheus-backup.tar.gz"));
        assert_eq!(job.ttl_seconds_after_finished, Some(120));
        assert!(job.validate().is_ok());

        assert_eq!(
            job.volumes[0].source,
            VolumeSource::PersistentVolumeClaim {
                claim: "prometheus".into()
            }
        );
    }

    #[test]
    fn env_excludes_empty_credential_values() {
        let mut req = request();
        req.credentials = Some(Credentials::new("AKIA", "secret", None));
        let job = req.build_job();

        assert_eq!(job.env.len(), 2);
        assert!(job.env.get(ENV_SESSION_TOKEN).is_none());
    }

    #[test]
    fn env_keeps_nonempty_session_token() {
        let mut req = request();
        req.credentials = Some(Credentials::new("AKIA", "secret", Some("token".into())));
        let job = req.build_job();

        assert_eq!(job.env.len(), 3);
        assert_eq!(
            job.env.get(ENV_SESSION_TOKEN),
            Some(&EnvValue::Literal("token".into()))
        );
    }

    #[tokio::test]
    async fn local_mode_without_matching_pod_runs_no_pipeline_stage() {
        let client = MockJobClient::new().with_pods(vec!["grafana-0".into()]);
        let sink = RecordingSink::new();
        let cancel = CancellationToken::new();
        let scratch = tempfile::tempdir().unwrap();

        let err = backup_local_in(&client, &request(), &cancel, &sink, scratch.path())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExportError::K8s(K8sError::PodNotFound { .. })
        ));
        assert!(sink.events().is_empty());
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failing_copy_skips_archive_and_upload_and_leaves_no_scratch() {
        // The copy step shells out to the copy utility against a pod that
        // does not exist, so it fails regardless of the environment.
        let client = MockJobClient::new().with_pods(vec!["prometheus-0".into()]);
        let sink = RecordingSink::new();
        let cancel = CancellationToken::new();
        let scratch = tempfile::tempdir().unwrap();

        let result = backup_local_in(&client, &request(), &cancel, &sink, scratch.path()).await;
        assert!(result.is_err());

        let events = sink.events();
        assert!(
            events
                .iter()
                .all(|e| !matches!(e, ExportEvent::ArchiveCreated { .. }
                    | ExportEvent::Uploaded { .. } | ExportEvent::CopyFinished))
        );
        // Scoped temp dir must be gone on the error path.
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }
}
