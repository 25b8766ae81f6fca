//! Progress reporting seam.
//!
//! Pipelines emit structured events into an [`ExportSink`] instead of
//! writing to a shared console, so presentation stays out of the business
//! logic and tests can assert on exactly which stages ran.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::info;

/// One progress/status event of an export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    /// A batch job was created in the cluster.
    JobCreated { name: String, namespace: String },
    /// The local transfer path located its source pod.
    PodFound { name: String },
    /// Pod copy started.
    CopyStarted { pod: String },
    /// Pod copy finished.
    CopyFinished,
    /// The gzip archive was written.
    ArchiveCreated { path: PathBuf },
    /// The archive (or export) landed in object storage.
    Uploaded { bucket: String, key: String },
}

/// Receiver of export progress events.
pub trait ExportSink: Send + Sync {
    fn event(&self, event: ExportEvent);
}

/// Sink that forwards events to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ExportSink for TracingSink {
    fn event(&self, event: ExportEvent) {
        match event {
            ExportEvent::JobCreated { name, namespace } => {
                info!(job = %name, namespace = %namespace, "job created")
            }
            ExportEvent::PodFound { name } => info!(pod = %name, "source pod found"),
            ExportEvent::CopyStarted { pod } => info!(pod = %pod, "copying data from pod"),
            ExportEvent::CopyFinished => info!("pod copy finished"),
            ExportEvent::ArchiveCreated { path } => {
                info!(path = %path.display(), "archive created")
            }
            ExportEvent::Uploaded { bucket, key } => {
                info!(target_path = %format!("s3://{bucket}/{key}"), "uploaded")
            }
        }
    }
}

/// Sink that records events for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ExportEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, in emission order.
    pub fn events(&self) -> Vec<ExportEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ExportSink for RecordingSink {
    fn event(&self, event: ExportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::{ExportEvent, ExportSink, RecordingSink};

    #[test]
    fn recording_sink_preserves_emission_order() {
        let sink = RecordingSink::new();
        sink.event(ExportEvent::PodFound {
            name: "prometheus-0".into(),
        });
        sink.event(ExportEvent::CopyFinished);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], ExportEvent::CopyFinished);
    }
}
