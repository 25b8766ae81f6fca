//! File copy out of a running pod.
//!
//! The orchestration client has no file-transfer call, so this shells out
//! to `kubectl cp` and captures its output for diagnostics.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::K8sError;

/// Copy `remote_path` from the pod into `dest` on the local filesystem.
///
/// Non-zero exit from the copy utility surfaces as [`K8sError::Copy`] with
/// the captured output. Cancellation kills the in-flight process and
/// returns [`K8sError::Canceled`].
pub async fn copy_from_pod(
    pod: &str,
    remote_path: &str,
    dest: &Path,
    namespace: &str,
    cancel: &CancellationToken,
) -> Result<(), K8sError> {
    let source = format!("{pod}:{remote_path}");
    trace!(%source, dest = %dest.display(), namespace, "spawning kubectl cp");

    let mut cmd = Command::new("kubectl");
    cmd.arg("cp")
        .arg(&source)
        .arg(dest)
        .arg("-n")
        .arg(namespace)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn()?;
    let output = tokio::select! {
        out = child.wait_with_output() => out?,
        _ = cancel.cancelled() => {
            debug!(%source, "cancellation requested; killing kubectl cp");
            return Err(K8sError::Canceled);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let diag = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(K8sError::Copy { output: diag });
    }

    debug!(%source, dest = %dest.display(), "pod copy finished");
    Ok(())
}
