//! Condition-based completion polling for submitted jobs.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    K8sError,
    client::{CONDITION_COMPLETE, CONDITION_FAILED, JobClient, JobCondition, JobHandle},
};

/// Fixed interval between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Bounds of one completion wait.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Wall-clock budget measured from loop start.
    pub timeout: Duration,
    /// Sleep between status polls.
    pub poll_interval: Duration,
}

impl WaitOptions {
    /// Options with the given timeout and the default poll interval.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(secs),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Terminal result of waiting on a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A `Complete` condition with status `True` was observed.
    Complete,
    /// A `Failed` condition with status `True` was observed; the message is
    /// whatever the controller attached, if anything.
    Failed { message: Option<String> },
    /// The timeout elapsed without any terminal condition. Unlike
    /// [`WaitOutcome::Failed`] there is no orchestrator-provided message.
    TimedOut,
}

impl WaitOutcome {
    /// Whether the job reached confirmed success.
    pub fn is_success(&self) -> bool {
        matches!(self, WaitOutcome::Complete)
    }
}

/// Poll the job's conditions until a terminal state or timeout.
///
/// Each iteration re-reads the conditions and checks `Complete` before
/// `Failed` before the elapsed-time budget, so a (protocol-permitted but
/// unexpected) simultaneous true-true state resolves as success. Between
/// polls the loop sleeps [`WaitOptions::poll_interval`]; the cancellation
/// token aborts that sleep and surfaces [`K8sError::Canceled`].
pub async fn wait_for_completion(
    client: &dyn JobClient,
    handle: &JobHandle,
    options: &WaitOptions,
    cancel: &CancellationToken,
) -> Result<WaitOutcome, K8sError> {
    let started = Instant::now();

    loop {
        let conditions = client.job_conditions(handle).await?;
        if let Some(outcome) = terminal_outcome(&conditions) {
            match &outcome {
                WaitOutcome::Complete => info!(job = %handle.name, "job completed"),
                WaitOutcome::Failed { message } => {
                    warn!(job = %handle.name, message = ?message, "job failed")
                }
                WaitOutcome::TimedOut => unreachable!("terminal_outcome never times out"),
            }
            return Ok(outcome);
        }

        let elapsed = started.elapsed();
        if elapsed > options.timeout {
            warn!(job = %handle.name, elapsed_secs = elapsed.as_secs(), "timed out waiting for job");
            return Ok(WaitOutcome::TimedOut);
        }
        debug!(
            job = %handle.name,
            elapsed_secs = elapsed.as_secs(),
            timeout_secs = options.timeout.as_secs(),
            "job not terminal yet",
        );

        tokio::select! {
            _ = tokio::time::sleep(options.poll_interval) => {}
            _ = cancel.cancelled() => return Err(K8sError::Canceled),
        }
    }
}

/// Map a condition set to its terminal outcome, if any.
///
/// `Complete=True` wins over `Failed=True`; everything else is non-terminal.
fn terminal_outcome(conditions: &[JobCondition]) -> Option<WaitOutcome> {
    if conditions.iter().any(|c| c.is_true(CONDITION_COMPLETE)) {
        return Some(WaitOutcome::Complete);
    }
    if let Some(failed) = conditions.iter().find(|c| c.is_true(CONDITION_FAILED)) {
        return Some(WaitOutcome::Failed {
            message: failed.message.clone(),
        });
    }
    None
}
