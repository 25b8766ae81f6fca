mod job;
pub use job::JobRequest;
