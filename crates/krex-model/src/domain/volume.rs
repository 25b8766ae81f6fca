use serde::{Deserialize, Serialize};

/// Mount point of a named volume inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// Name of the volume being mounted (must match a [`Volume`]).
    pub name: String,
    /// Absolute path inside the container.
    pub mount_path: String,
    /// Whether the mount is read-only.
    pub read_only: bool,
}

impl VolumeMount {
    /// Create a mount for the named volume.
    pub fn new<N, P>(name: N, mount_path: P, read_only: bool) -> Self
    where
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            read_only,
        }
    }
}

/// Projection of one secret key to a relative path within a secret volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretItem {
    /// Key inside the secret.
    pub key: String,
    /// Relative file path under the mount point.
    pub path: String,
}

/// Backing source of a pod volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VolumeSource {
    /// Selected items of a named secret, exposed as files.
    Secret {
        secret: String,
        items: Vec<SecretItem>,
    },
    /// An existing persistent volume claim.
    PersistentVolumeClaim { claim: String },
}

/// A named pod volume together with its backing source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub name: String,
    pub source: VolumeSource,
}

impl Volume {
    /// Volume exposing selected keys of a secret as files.
    pub fn secret_items<N, S>(name: N, secret: S, items: Vec<SecretItem>) -> Self
    where
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            source: VolumeSource::Secret {
                secret: secret.into(),
                items,
            },
        }
    }

    /// Volume backed by an existing persistent volume claim.
    pub fn persistent_volume_claim<N, C>(name: N, claim: C) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            source: VolumeSource::PersistentVolumeClaim {
                claim: claim.into(),
            },
        }
    }
}
