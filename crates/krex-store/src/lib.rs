//! Object storage and credential resolution.

mod error;
pub use error::StoreError;

mod profile;
pub use profile::resolve_profile;

mod s3;
pub use s3::upload_file;
