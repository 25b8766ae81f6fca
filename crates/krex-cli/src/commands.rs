//! Subcommand execution and exit-status mapping.

use std::io::Write;

use anyhow::Context;
use time::{OffsetDateTime, macros::format_description};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use krex_export::{
    ExportOutcome, MongoExportRequest, PromExportRequest, TracingSink, backup_local,
    run_mongo_export, run_prometheus_export,
};
use krex_k8s::{KubeJobClient, WaitOptions};
use krex_model::Credentials;
use krex_store::resolve_profile;

use crate::cli::{MongodbArgs, PrometheusArgs};

/// Run the MongoDB export; returns whether the invocation succeeded.
pub async fn mongodb(args: MongodbArgs, cancel: &CancellationToken) -> anyhow::Result<bool> {
    // An unresolvable profile aborts the export outright.
    let credentials = match load_profile(args.profile.as_deref())? {
        ProfileResolution::NotRequested => None,
        ProfileResolution::Loaded(creds) => Some(creds),
        ProfileResolution::Missing(profile) => {
            anyhow::bail!("could not resolve credentials from profile '{profile}'")
        }
    };

    let key = match args.key {
        Some(key) => key,
        None => {
            let key = default_object_key(&args.collection)?;
            info!(key = %key, "auto-generated object key");
            key
        }
    };

    let request = MongoExportRequest {
        namespace: args.namespace,
        collection: args.collection,
        bucket: args.bucket,
        key,
        secret_name: args.mongodb_secret,
        credentials,
    };

    let client = KubeJobClient::from_default_config()
        .await
        .context("failed to connect to the cluster")?;
    let wait = args.wait.then(|| WaitOptions::with_timeout_secs(args.timeout));

    let outcome = run_mongo_export(&client, &request, wait.as_ref(), cancel, &TracingSink).await?;
    report_outcome(&outcome);
    Ok(outcome.is_success())
}

/// Run the Prometheus backup; returns whether the invocation succeeded.
pub async fn prometheus(args: PrometheusArgs, cancel: &CancellationToken) -> anyhow::Result<bool> {
    // Prometheus may proceed without credentials after explicit confirmation.
    let credentials = match load_profile(args.profile.as_deref())? {
        ProfileResolution::NotRequested => None,
        ProfileResolution::Loaded(creds) => Some(creds),
        ProfileResolution::Missing(profile) => {
            warn!(profile = %profile, "could not resolve credentials from profile");
            if !confirm("Continue without credentials?")? {
                anyhow::bail!("aborted: no credentials for profile '{profile}'");
            }
            None
        }
    };

    let request = PromExportRequest {
        namespace: args.namespace,
        filename: args.filename,
        bucket: args.bucket,
        credentials,
    };

    let client = KubeJobClient::from_default_config()
        .await
        .context("failed to connect to the cluster")?;

    if args.local {
        backup_local(&client, &request, cancel, &TracingSink).await?;
        info!(
            target_path = %format!("s3://{}/{}", request.bucket, request.object_key()),
            "local backup finished",
        );
        return Ok(true);
    }

    let wait = args.wait.then(|| WaitOptions::with_timeout_secs(args.timeout));
    let outcome =
        run_prometheus_export(&client, &request, wait.as_ref(), cancel, &TracingSink).await?;
    report_outcome(&outcome);
    Ok(outcome.is_success())
}

enum ProfileResolution {
    NotRequested,
    Loaded(Credentials),
    Missing(String),
}

fn load_profile(profile: Option<&str>) -> anyhow::Result<ProfileResolution> {
    let Some(name) = profile else {
        return Ok(ProfileResolution::NotRequested);
    };
    match resolve_profile(name)? {
        Some(creds) => {
            info!(profile = name, "credentials loaded");
            Ok(ProfileResolution::Loaded(creds))
        }
        None => Ok(ProfileResolution::Missing(name.to_string())),
    }
}

fn default_object_key(collection: &str) -> anyhow::Result<String> {
    let format = format_description!("[year][month][day]-[hour][minute][second]");
    let timestamp = OffsetDateTime::now_utc().format(&format)?;
    Ok(format!("exports/{collection}/{timestamp}.json"))
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn report_outcome(outcome: &ExportOutcome) {
    let handle = outcome.handle();
    match outcome {
        ExportOutcome::Submitted { .. } => info!(
            job = %handle.name,
            hint = %format!("kubectl logs -n {} job/{}", handle.namespace, handle.name),
            "job created; not waiting for completion",
        ),
        ExportOutcome::Completed { .. } => info!(job = %handle.name, "export completed"),
        ExportOutcome::JobFailed { message, .. } => error!(
            job = %handle.name,
            message = message.as_deref().unwrap_or("unknown error"),
            hint = %format!("kubectl logs -n {} job/{}", handle.namespace, handle.name),
            "export job failed",
        ),
        ExportOutcome::TimedOut { .. } => error!(
            job = %handle.name,
            hint = %format!("kubectl get jobs -n {} {}", handle.namespace, handle.name),
            "timed out waiting for export job",
        ),
    }
}
