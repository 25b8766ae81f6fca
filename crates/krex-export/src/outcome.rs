use krex_k8s::{JobHandle, WaitOutcome};

/// Terminal result of one export invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Job submitted; completion was not awaited.
    Submitted { handle: JobHandle },
    /// Job submitted and observed to complete.
    Completed { handle: JobHandle },
    /// Job submitted but reported a `Failed` condition.
    JobFailed {
        handle: JobHandle,
        message: Option<String>,
    },
    /// Job submitted but no terminal condition arrived within the budget.
    TimedOut { handle: JobHandle },
}

impl ExportOutcome {
    /// Whether the invocation should exit zero.
    ///
    /// A fire-and-forget submission counts as success; only an observed
    /// failure or timeout does not.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExportOutcome::Submitted { .. } | ExportOutcome::Completed { .. }
        )
    }

    /// Handle of the submitted job, for user-facing log hints.
    pub fn handle(&self) -> &JobHandle {
        match self {
            ExportOutcome::Submitted { handle }
            | ExportOutcome::Completed { handle }
            | ExportOutcome::JobFailed { handle, .. }
            | ExportOutcome::TimedOut { handle } => handle,
        }
    }

    pub(crate) fn from_wait(handle: JobHandle, outcome: WaitOutcome) -> Self {
        match outcome {
            WaitOutcome::Complete => ExportOutcome::Completed { handle },
            WaitOutcome::Failed { message } => ExportOutcome::JobFailed { handle, message },
            WaitOutcome::TimedOut => ExportOutcome::TimedOut { handle },
        }
    }
}

#[cfg(test)]
mod tests {
    use krex_k8s::JobHandle;

    use super::ExportOutcome;

    fn handle() -> JobHandle {
        JobHandle {
            namespace: "default".into(),
            name: "mongo-export-taskdata-abcd1234".into(),
        }
    }

    #[test]
    fn only_submitted_and_completed_are_success() {
        assert!(ExportOutcome::Submitted { handle: handle() }.is_success());
        assert!(ExportOutcome::Completed { handle: handle() }.is_success());
        assert!(
            !ExportOutcome::JobFailed {
                handle: handle(),
                message: None
            }
            .is_success()
        );
        assert!(!ExportOutcome::TimedOut { handle: handle() }.is_success());
    }
}
