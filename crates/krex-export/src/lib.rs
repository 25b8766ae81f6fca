//! Export pipelines: MongoDB collections and Prometheus data to object
//! storage, either via a batch job or via a direct pod copy.

mod archive;

mod error;
pub use error::ExportError;

mod mongodb;
pub use mongodb::{MongoExportRequest, run_mongo_export};

mod outcome;
pub use outcome::ExportOutcome;

mod prometheus;
pub use prometheus::{PromExportRequest, backup_local, run_prometheus_export};

mod sink;
pub use sink::{ExportEvent, ExportSink, RecordingSink, TracingSink};
