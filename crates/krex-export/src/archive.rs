//! Gzip-compressed tar archiving of a copied directory.

use std::fs::File;
use std::path::Path;

use flate2::{Compression, write::GzEncoder};
use tracing::debug;

use crate::ExportError;

/// Archive `src_dir` into `archive_path` as gzip-compressed tar, with the
/// directory stored under `entry_name` inside the archive.
///
/// The tar walk and compression are blocking; they run on the blocking
/// thread pool.
pub async fn create_tar_gz(
    src_dir: &Path,
    archive_path: &Path,
    entry_name: &str,
) -> Result<(), ExportError> {
    let src = src_dir.to_path_buf();
    let dst = archive_path.to_path_buf();
    let name = entry_name.to_string();

    let result = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let file = File::create(&dst)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.append_dir_all(&name, &src)?;
        builder.into_inner()?.finish()?;
        Ok(())
    })
    .await
    .map_err(|e| ExportError::Archive(e.to_string()))?;

    result.map_err(|e| ExportError::Archive(e.to_string()))?;
    debug!(archive = %archive_path.display(), "tar.gz written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::create_tar_gz;
    use crate::ExportError;

    #[tokio::test]
    async fn archives_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("snapshot");
        std::fs::create_dir(&data_dir).unwrap();
        std::fs::write(data_dir.join("chunk"), b"series data").unwrap();

        let archive = dir.path().join("snapshot.tar.gz");
        create_tar_gz(&data_dir, &archive, "snapshot").await.unwrap();

        let len = std::fs::metadata(&archive).unwrap().len();
        assert!(len > 0);
    }

    #[tokio::test]
    async fn missing_source_is_an_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("out.tar.gz");

        let err = create_tar_gz(&dir.path().join("nope"), &archive, "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Archive(_)));
    }
}
