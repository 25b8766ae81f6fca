//! Conversion from the typed [`JobRequest`] to the `batch/v1` wire object.

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{
    Container, EnvVar, EnvVarSource, KeyToPath, PersistentVolumeClaimVolumeSource, PodSpec,
    PodTemplateSpec, SecretKeySelector, SecretVolumeSource,
};
use k8s_openapi::api::core::v1::{Volume as K8sVolume, VolumeMount as K8sVolumeMount};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use krex_model::{EnvBinding, EnvValue, JobRequest, Volume, VolumeMount, VolumeSource};

/// Render a [`JobRequest`] as a `batch/v1` Job with a single container.
pub fn to_k8s_job(request: &JobRequest) -> Job {
    let container = Container {
        name: request.container_name.clone(),
        image: Some(request.image.clone()),
        command: Some(request.command.clone()),
        args: Some(request.args.clone()),
        env: Some(request.env.iter().map(env_var).collect()),
        volume_mounts: Some(request.mounts.iter().map(volume_mount).collect()),
        ..Default::default()
    };

    Job {
        metadata: ObjectMeta {
            name: Some(request.name.as_str().to_string()),
            namespace: Some(request.namespace.clone()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            backoff_limit: Some(request.backoff_limit),
            template: PodTemplateSpec {
                metadata: None,
                spec: Some(PodSpec {
                    containers: vec![container],
                    restart_policy: Some(request.restart.as_str().to_string()),
                    volumes: Some(request.volumes.iter().map(volume).collect()),
                    ..Default::default()
                }),
            },
            ttl_seconds_after_finished: request.ttl_seconds_after_finished,
            ..Default::default()
        }),
        status: None,
    }
}

fn env_var(binding: &EnvBinding) -> EnvVar {
    match binding.value() {
        EnvValue::Literal(value) => EnvVar {
            name: binding.name().to_string(),
            value: Some(value.clone()),
            value_from: None,
        },
        EnvValue::SecretKey { secret, key } => EnvVar {
            name: binding.name().to_string(),
            value: None,
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: secret.clone(),
                    key: key.clone(),
                    optional: None,
                }),
                ..Default::default()
            }),
        },
    }
}

fn volume_mount(mount: &VolumeMount) -> K8sVolumeMount {
    K8sVolumeMount {
        name: mount.name.clone(),
        mount_path: mount.mount_path.clone(),
        read_only: Some(mount.read_only),
        ..Default::default()
    }
}

fn volume(vol: &Volume) -> K8sVolume {
    match &vol.source {
        VolumeSource::Secret { secret, items } => K8sVolume {
            name: vol.name.clone(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(secret.clone()),
                items: Some(
                    items
                        .iter()
                        .map(|i| KeyToPath {
                            key: i.key.clone(),
                            path: i.path.clone(),
                            mode: None,
                        })
                        .collect(),
                ),
                ..Default::default()
            }),
            ..Default::default()
        },
        VolumeSource::PersistentVolumeClaim { claim } => K8sVolume {
            name: vol.name.clone(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: claim.clone(),
                read_only: None,
            }),
            ..Default::default()
        },
    }
}
