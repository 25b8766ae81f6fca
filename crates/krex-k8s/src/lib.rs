//! Kubernetes side of the export tool.
//!
//! This crate wraps the orchestration API behind a small trait seam:
//! - [`JobClient`] — submit a job, re-read its conditions, list pods
//! - [`wait_for_completion`] — bounded poll loop over job conditions
//! - [`pods`] — prefix-based pod selection
//! - [`copy_from_pod`] — file copy out of a running pod via `kubectl cp`

mod client;
pub use client::{
    CONDITION_COMPLETE, CONDITION_FAILED, JobClient, JobCondition, JobHandle, KubeJobClient,
};

mod convert;
pub use convert::to_k8s_job;

mod copy;
pub use copy::copy_from_pod;

mod error;
pub use error::K8sError;

pub mod pods;

mod wait;
pub use wait::{DEFAULT_POLL_INTERVAL, WaitOptions, WaitOutcome, wait_for_completion};

pub mod testing;
