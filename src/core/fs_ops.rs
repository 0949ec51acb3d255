// src/core/fs_ops.rs
//! File system helpers shared by the stores, the upload handler and config

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::app_log;

pub struct FsOps;

impl FsOps {
    /// Create `path` and its parents if missing. Idempotent.
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Replace the file content, creating the parent directory first.
    pub async fn write_file_safe(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        app_log!(debug, "Written file: {}", path.display());
        Ok(())
    }

    /// `None` when the file does not exist; any other failure is an error.
    pub async fn read_file_if_exists(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read file: {}", path.display()))
            }
        }
    }

    /// Best-effort removal of a temporary file.
    pub async fn remove_temp_file(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                app_log!(warn, "Failed to remove temp file {}: {}", path.display(), e);
            }
        }
    }

    /// Resolve `relative` against `base` unless it is already absolute.
    pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/file.txt");

        FsOps::write_file_safe(&path, b"hello").await.unwrap();
        assert_eq!(
            FsOps::read_file_if_exists(&path).await.unwrap().as_deref(),
            Some("hello")
        );
    }

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(FsOps::read_file_if_exists(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data");
        FsOps::ensure_dir_exists(&target).await.unwrap();
        FsOps::ensure_dir_exists(&target).await.unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_normalize_path() {
        let base = Path::new("/srv/app");
        assert_eq!(
            FsOps::normalize_path(base, Path::new("data")),
            PathBuf::from("/srv/app/data")
        );
        assert_eq!(
            FsOps::normalize_path(base, Path::new("/var/data")),
            PathBuf::from("/var/data")
        );
    }
}
