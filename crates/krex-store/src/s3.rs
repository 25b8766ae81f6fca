//! S3 upload through an opendal operator.

use std::path::Path;

use opendal::{Operator, services::S3};
use tracing::{debug, info};

use krex_model::Credentials;

use crate::StoreError;

/// Region fallback when the environment does not name one.
const DEFAULT_REGION: &str = "us-east-1";

/// Upload a local file to `s3://{bucket}/{key}`.
///
/// With explicit `credentials` the operator is configured from the triple;
/// otherwise opendal falls back to the ambient credential chain
/// (environment, instance profile).
pub async fn upload_file(
    path: &Path,
    bucket: &str,
    key: &str,
    credentials: Option<&Credentials>,
) -> Result<(), StoreError> {
    let op = build_operator(bucket, credentials)?;

    let data = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = data.len(), bucket, key, "uploading archive");

    op.write(key, data)
        .await
        .map_err(|e| StoreError::Upload(e.to_string()))?;

    info!(bucket, key, "upload finished");
    Ok(())
}

fn build_operator(bucket: &str, credentials: Option<&Credentials>) -> Result<Operator, StoreError> {
    let mut builder = S3::default();
    builder.bucket(bucket);
    builder.region(&region_from_env());

    if let Some(creds) = credentials {
        builder.access_key_id(&creds.access_key_id);
        builder.secret_access_key(&creds.secret_access_key);
        if let Some(token) = creds.session_token.as_deref().filter(|t| !t.is_empty()) {
            builder.security_token(token);
        }
    }

    Ok(Operator::new(builder)
        .map_err(|e| StoreError::Upload(e.to_string()))?
        .finish())
}

fn region_from_env() -> String {
    std::env::var("AWS_REGION")
        .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
        .unwrap_or_else(|_| DEFAULT_REGION.to_string())
}

#[cfg(test)]
mod tests {
    use krex_model::Credentials;

    use super::build_operator;

    #[test]
    fn operator_builds_with_explicit_credentials() {
        let creds = Credentials::new("AKIA", "secret", Some("token".into()));
        assert!(build_operator("my-bucket", Some(&creds)).is_ok());
    }

    #[test]
    fn operator_rejects_empty_bucket() {
        let creds = Credentials::new("AKIA", "secret", None);
        assert!(build_operator("", Some(&creds)).is_err());
    }
}
