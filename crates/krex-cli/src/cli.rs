//! Command-line surface of `krex`.

use clap::{Args, Parser, Subcommand};

use crate::logger::LogFormat;

#[derive(Debug, Parser)]
#[command(
    name = "krex",
    version,
    about = "Export cluster data (MongoDB collections, Prometheus time series) to object storage"
)]
pub struct Cli {
    /// Log level filter expression (e.g. "info", "krex_k8s=debug,info").
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export a MongoDB collection to object storage via a batch job.
    Mongodb(MongodbArgs),
    /// Back up Prometheus data to object storage via a job or pod copy.
    Prometheus(PrometheusArgs),
}

#[derive(Debug, Args)]
pub struct MongodbArgs {
    /// Kubernetes namespace to use.
    #[arg(long, default_value = "default")]
    pub namespace: String,

    /// Name of the secret holding the MongoDB connection fields.
    #[arg(long, default_value = "mongodb")]
    pub mongodb_secret: String,

    /// Collection to export.
    #[arg(long, default_value = "TaskData")]
    pub collection: String,

    /// Bucket to upload to.
    #[arg(long)]
    pub bucket: String,

    /// Object key; auto-generated from the collection and timestamp when
    /// omitted.
    #[arg(long)]
    pub key: Option<String>,

    /// Credential profile for the upload side.
    #[arg(long)]
    pub profile: Option<String>,

    /// Wait for the job to complete.
    #[arg(long)]
    pub wait: bool,

    /// Timeout in seconds when waiting for completion.
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,
}

#[derive(Debug, Args)]
pub struct PrometheusArgs {
    /// Kubernetes namespace to use.
    #[arg(long, default_value = "default")]
    pub namespace: String,

    /// Backup filename, without extension.
    #[arg(long)]
    pub filename: String,

    /// Bucket to upload to.
    #[arg(long)]
    pub bucket: String,

    /// Credential profile for the upload side.
    #[arg(long)]
    pub profile: Option<String>,

    /// Copy data directly out of the Prometheus pod instead of submitting
    /// a persistent-volume backup job.
    #[arg(long)]
    pub local: bool,

    /// Wait for the job to complete (job mode only).
    #[arg(long)]
    pub wait: bool,

    /// Timeout in seconds when waiting for completion.
    #[arg(long, default_value_t = 600)]
    pub timeout: u64,
}
