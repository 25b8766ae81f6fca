//! MongoDB collection export via a batch job running the sling data tool.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use krex_k8s::{JobClient, WaitOptions, wait_for_completion};
use krex_model::{
    Credentials, EnvBindings, JobName, JobRequest, RestartPolicy, SecretItem, Volume, VolumeMount,
};

use crate::{
    ExportError, ExportOutcome,
    sink::{ExportEvent, ExportSink},
};

/// Container image carrying the data-movement tool.
const SLING_IMAGE: &str = "slingdata/sling";
/// Mount point of the TLS certificate secret.
const CERT_MOUNT_PATH: &str = "/mongodb/certs";

/// Inputs of one MongoDB collection export.
#[derive(Debug, Clone)]
pub struct MongoExportRequest {
    /// Namespace the job runs in.
    pub namespace: String,
    /// Collection to export. Not validated beyond presence; a bad name
    /// surfaces as a downstream job failure.
    pub collection: String,
    /// Target bucket.
    pub bucket: String,
    /// Target object key.
    pub key: String,
    /// Secret holding the MongoDB connection fields
    /// (`username`/`password`/`host`/`port`) and the `chain.pem` cert.
    pub secret_name: String,
    /// Optional static credential triple for the upload side.
    pub credentials: Option<Credentials>,
}

impl MongoExportRequest {
    /// Build the job description for this export.
    ///
    /// The environment carries the four secret-derived connection bindings
    /// plus, when credentials are given, every credential entry
    /// unconditionally — including an empty session token. The Prometheus
    /// builder filters empty values instead; the asymmetry is deliberate
    /// and covered by tests on both sides.
    pub fn build_job(&self) -> JobRequest {
        let mut env = EnvBindings::new();
        env.push_secret_key("MONGO_USER", &self.secret_name, "username");
        env.push_secret_key("MONGO_PASS", &self.secret_name, "password");
        env.push_secret_key("MONGO_HOST", &self.secret_name, "host");
        env.push_secret_key("MONGO_PORT", &self.secret_name, "port");
        if let Some(creds) = &self.credentials {
            env = env.extended(&creds.env_bindings());
        }

        let script = format!(
            "export MONGODB=\"mongodb://$MONGO_USER:$MONGO_PASS@$MONGO_HOST:$MONGO_PORT/database?ssl=true&tlsInsecure=true\"\n\
             sling run --src-conn MONGODB --src-stream 'database.{collection}' --tgt-conn S3 --tgt-object \"s3://{bucket}/{key}\"\n",
            collection = self.collection,
            bucket = self.bucket,
            key = self.key,
        );

        JobRequest {
            namespace: self.namespace.clone(),
            name: JobName::generate(&format!(
                "mongo-export-{}",
                self.collection.to_lowercase()
            )),
            container_name: "sling".into(),
            image: SLING_IMAGE.into(),
            command: vec!["/bin/sh".into(), "-c".into()],
            args: vec![script],
            env,
            mounts: vec![VolumeMount::new("mongodb-cert", CERT_MOUNT_PATH, true)],
            volumes: vec![Volume::secret_items(
                "mongodb-cert",
                &self.secret_name,
                vec![SecretItem {
                    key: "chain.pem".into(),
                    path: "chain.pem".into(),
                }],
            )],
            restart: RestartPolicy::Never,
            backoff_limit: 4,
            ttl_seconds_after_finished: None,
        }
    }
}

/// Submit the MongoDB export job and optionally await its completion.
pub async fn run_mongo_export(
    client: &dyn JobClient,
    request: &MongoExportRequest,
    wait: Option<&WaitOptions>,
    cancel: &CancellationToken,
    sink: &dyn ExportSink,
) -> Result<ExportOutcome, ExportError> {
    let job = request.build_job();
    debug!(job = %job.name, collection = %request.collection, "submitting mongodb export job");

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

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use krex_k8s::testing::MockJobClient;
    use krex_k8s::{JobCondition, K8sError, WaitOptions};
    use krex_model::{Credentials, ENV_SESSION_TOKEN, EnvValue};

    use super::MongoExportRequest;
    use crate::{ExportError, ExportOutcome, RecordingSink, run_mongo_export};

    fn request() -> MongoExportRequest {
        MongoExportRequest {
            namespace: "default".into(),
            collection: "TaskData".into(),
            bucket: "backups".into(),
            key: "exports/TaskData/20260830.json".into(),
            secret_name: "mongodb".into(),
            credentials: None,
        }
    }

    #[test]
    fn job_has_nonempty_command_args_and_all_four_secret_bindings() {
        let job = request().build_job();

        assert!(!job.command.is_empty());
        assert!(!job.args.is_empty());
        assert!(job.validate().is_ok());

        for name in ["MONGO_USER", "MONGO_PASS", "MONGO_HOST", "MONGO_PORT"] {
            match job.env.get(name) {
                Some(EnvValue::SecretKey { secret, .. }) => assert_eq!(secret, "mongodb"),
                other => panic!("binding {name} missing or not secret-derived: {other:?}"),
            }
        }
    }

    #[test]
    fn job_name_lowercases_collection_and_is_unique() {
        let a = request().build_job();
        let b = request().build_job();

        assert!(a.name.as_str().starts_with("mongo-export-taskdata-"));
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn args_interpolate_collection_and_target_location() {
        let job = request().build_job();
        let script = &job.args[0];

        assert!(script.contains("'database.TaskData'"));
        assert!(script.contains("s3://backups/exports/TaskData/20260830.json"));
    }

    #[test]
    fn credential_entries_attach_unconditionally_including_empty_token() {
        let mut req = request();
        req.credentials = Some(Credentials::new("AKIA", "secret", None));
        let job = req.build_job();

        // 4 secret bindings + all 3 credential entries, empty token included.
        assert_eq!(job.env.len(), 7);
        assert_eq!(
            job.env.get(ENV_SESSION_TOKEN),
            Some(&EnvValue::Literal(String::new()))
        );
    }

    #[tokio::test]
    async fn no_wait_returns_submitted() {
        let client = MockJobClient::new();
        let sink = RecordingSink::new();
        let cancel = CancellationToken::new();

        let outcome = run_mongo_export(&client, &request(), None, &cancel, &sink)
            .await
            .unwrap();

        assert!(matches!(outcome, ExportOutcome::Submitted { .. }));
        assert_eq!(client.created_jobs().len(), 1);
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_maps_failed_condition_with_message() {
        let client = MockJobClient::new().with_condition_script(vec![vec![JobCondition {
            type_: "Failed".into(),
            status: "True".into(),
            message: Some("BackoffLimitExceeded".into()),
        }]]);
        let sink = RecordingSink::new();
        let cancel = CancellationToken::new();

        let outcome = run_mongo_export(
            &client,
            &request(),
            Some(&WaitOptions::with_timeout_secs(600)),
            &cancel,
            &sink,
        )
        .await
        .unwrap();

        match outcome {
            ExportOutcome::JobFailed { message, .. } => {
                assert_eq!(message.as_deref(), Some("BackoffLimitExceeded"));
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submission_rejection_propagates_message() {
        let client = MockJobClient::new().with_submission_error("jobs is forbidden");
        let sink = RecordingSink::new();
        let cancel = CancellationToken::new();

        let err = run_mongo_export(&client, &request(), None, &cancel, &sink)
            .await
            .unwrap_err();

        match err {
            ExportError::K8s(K8sError::Submission(message)) => {
                assert_eq!(message, "jobs is forbidden");
            }
            other => panic!("expected submission error, got {other:?}"),
        }
        assert!(sink.events().is_empty());
    }
}
