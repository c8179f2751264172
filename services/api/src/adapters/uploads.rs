//! services/api/src/adapters/uploads.rs
//!
//! Disk-backed implementation of the `UploadStore` port.
//!
//! Files are named `<unix millis><.ext>`; two uploads in the same millisecond
//! with the same extension overwrite each other.

use async_trait::async_trait;
use chrono::Utc;
use doubtnlearn_core::ports::{PortError, PortResult, UploadStore};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// URL prefix under which stored files are served back.
pub const UPLOADS_URL_PREFIX: &str = "uploads";

pub struct DiskUploadStore {
    dir: PathBuf,
}

impl DiskUploadStore {
    /// The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// The client's extension, lowercased with its dot, or empty when it is not plain ASCII alphanumerics.
pub fn stored_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[async_trait]
impl UploadStore for DiskUploadStore {
    async fn save(&self, original_name: &str, data: &[u8]) -> PortResult<String> {
        let file_name = format!(
            "{}{}",
            Utc::now().timestamp_millis(),
            stored_extension(original_name)
        );
        let destination = self.dir.join(&file_name);

        tokio::fs::write(&destination, data).await.map_err(|e| {
            error!("Failed to write upload to {}: {:?}", destination.display(), e);
            PortError::Unexpected(format!("Failed to store upload: {e}"))
        })?;

        info!(bytes = data.len(), file = %file_name, "Stored upload");
        Ok(format!("{UPLOADS_URL_PREFIX}/{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_kept_lowercased() {
        assert_eq!(stored_extension("photo.PNG"), ".png");
        assert_eq!(stored_extension("archive.tar.gz"), ".gz");
        assert_eq!(stored_extension("../../etc/passwd.jpg"), ".jpg");
    }

    #[test]
    fn odd_extensions_are_dropped() {
        assert_eq!(stored_extension("README"), "");
        assert_eq!(stored_extension("weird.p$g"), "");
        assert_eq!(stored_extension(".hidden"), "");
    }

    #[tokio::test]
    async fn save_writes_into_directory_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskUploadStore::new(dir.path());

        let reference = store.save("diagram.png", b"fake-png").await.unwrap();
        let file_name = reference.strip_prefix("uploads/").unwrap();
        let stem = file_name.strip_suffix(".png").unwrap();
        assert!(stem.chars().all(|c| c.is_ascii_digit()));

        let written = tokio::fs::read(dir.path().join(file_name)).await.unwrap();
        assert_eq!(written, b"fake-png");
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskUploadStore::new(dir.path().join("absent"));
        assert!(store.save("a.png", b"x").await.is_err());
    }
}
