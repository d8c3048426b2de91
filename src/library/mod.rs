/// Media library on object storage
///
/// Generic file storage for the dashboard (uploaded photos land here too).
/// The backend trait keeps cloud storage swappable; only the disk backend is
/// implemented, the S3 variant is declared in config but not yet wired.
use crate::{
    config::ObjectStoreConfig,
    error::{DeskError, DeskResult},
};
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

/// One stored object or folder as seen by a listing
#[derive(Debug, Clone, Serialize)]
pub struct ObjectEntry {
    /// Path relative to the listed prefix; folders carry a trailing '/'
    pub name: String,
    pub is_folder: bool,
}

/// Storage backend for the media library
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    async fn put(&self, path: &str, data: Vec<u8>) -> DeskResult<()>;
    async fn delete(&self, path: &str) -> DeskResult<()>;
    async fn exists(&self, path: &str) -> DeskResult<bool>;
    /// Entries directly under a prefix ('' for the root)
    async fn list(&self, prefix: &str) -> DeskResult<Vec<ObjectEntry>>;
}

/// Disk storage backend
#[derive(Clone)]
pub struct DiskObjectBackend {
    base_path: PathBuf,
}

impl DiskObjectBackend {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn object_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

#[async_trait]
impl ObjectBackend for DiskObjectBackend {
    async fn put(&self, path: &str, data: Vec<u8>) -> DeskResult<()> {
        let full = self.object_path(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DeskError::Storage(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(&full, data)
            .await
            .map_err(|e| DeskError::Storage(format!("Failed to write object {}: {}", path, e)))?;

        Ok(())
    }

    async fn delete(&self, path: &str) -> DeskResult<()> {
        match fs::remove_file(self.object_path(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DeskError::NotFound(format!("No such object: {}", path)))
            }
            Err(e) => Err(DeskError::Storage(format!(
                "Failed to delete object {}: {}",
                path, e
            ))),
        }
    }

    async fn exists(&self, path: &str) -> DeskResult<bool> {
        Ok(self.object_path(path).exists())
    }

    async fn list(&self, prefix: &str) -> DeskResult<Vec<ObjectEntry>> {
        let dir = self.object_path(prefix);

        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DeskError::Storage(format!(
                    "Failed to list {}: {}",
                    prefix, e
                )))
            }
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| DeskError::Storage(format!("Failed to list {}: {}", prefix, e)))?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_folder = entry
                .file_type()
                .await
                .map_err(|e| DeskError::Storage(format!("Failed to stat {}: {}", name, e)))?
                .is_dir();
            entries.push(ObjectEntry {
                name: if is_folder { format!("{}/", name) } else { name },
                is_folder,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// A media library listing: files and folders under one path
#[derive(Debug, Clone, Serialize)]
pub struct LibraryListing {
    pub current_path: String,
    pub folders: Vec<String>,
    pub files: Vec<LibraryFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryFile {
    pub name: String,
    pub url: String,
}

/// Media library facade over an object backend
#[derive(Clone)]
pub struct MediaLibrary {
    backend: Arc<dyn ObjectBackend>,
    public_url: String,
}

impl MediaLibrary {
    pub fn new(config: &ObjectStoreConfig, public_url: String) -> DeskResult<Self> {
        let backend: Arc<dyn ObjectBackend> = match config {
            ObjectStoreConfig::Disk { location } => {
                Arc::new(DiskObjectBackend::new(location.clone()))
            }
            ObjectStoreConfig::S3 { .. } => {
                return Err(DeskError::Internal(
                    "S3 backend not yet implemented".to_string(),
                ));
            }
        };

        Ok(Self {
            backend,
            public_url,
        })
    }

    /// Public URL of a stored object
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/media/{}", self.public_url, path)
    }

    /// Store an object, returning its public URL
    pub async fn store(&self, path: &str, data: Vec<u8>) -> DeskResult<String> {
        let path = Self::validate_path(path)?;
        self.backend.put(path, data).await?;
        Ok(self.url_for(path))
    }

    /// Delete an object by path
    pub async fn delete(&self, path: &str) -> DeskResult<()> {
        self.backend.delete(Self::validate_path(path)?).await
    }

    /// List files and folders under a path
    ///
    /// A non-empty path is normalized to end with '/'. The root listing
    /// shows folders only; loose files at the root are not surfaced.
    pub async fn list(&self, path: &str) -> DeskResult<LibraryListing> {
        let mut current_path = Self::validate_path(path)?.to_string();
        if !current_path.is_empty() && !current_path.ends_with('/') {
            current_path.push('/');
        }

        let entries = self.backend.list(current_path.trim_end_matches('/')).await?;

        let mut folders = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            if entry.is_folder {
                folders.push(entry.name);
            } else if !current_path.is_empty() {
                // Files are hidden at the root
                let full = format!("{}{}", current_path, entry.name);
                files.push(LibraryFile {
                    url: self.url_for(&full),
                    name: entry.name,
                });
            }
        }

        Ok(LibraryListing {
            current_path,
            folders,
            files,
        })
    }

    /// Reject path traversal and absolute paths
    fn validate_path(path: &str) -> DeskResult<&str> {
        let trimmed = path.trim_start_matches('/');
        if trimmed.split('/').any(|segment| segment == "..") {
            return Err(DeskError::Validation(format!(
                "Invalid library path: {}",
                path
            )));
        }
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObjectStoreConfig;
    use tempfile::tempdir;

    fn library(dir: &tempfile::TempDir) -> MediaLibrary {
        MediaLibrary::new(
            &ObjectStoreConfig::Disk {
                location: dir.path().to_path_buf(),
            },
            "http://localhost:8300".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_store_and_delete() {
        let dir = tempdir().unwrap();
        let lib = library(&dir);

        let url = lib
            .store("photos/menu.jpg", b"jpegdata".to_vec())
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8300/media/photos/menu.jpg");
        assert!(dir.path().join("photos/menu.jpg").exists());

        lib.delete("photos/menu.jpg").await.unwrap();
        assert!(!dir.path().join("photos/menu.jpg").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_object_is_not_found() {
        let dir = tempdir().unwrap();
        let lib = library(&dir);

        let err = lib.delete("photos/ghost.jpg").await.unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_root_listing_shows_folders_only() {
        let dir = tempdir().unwrap();
        let lib = library(&dir);

        lib.store("loose.txt", b"x".to_vec()).await.unwrap();
        lib.store("photos/menu.jpg", b"y".to_vec()).await.unwrap();

        let listing = lib.list("").await.unwrap();
        assert_eq!(listing.folders, vec!["photos/".to_string()]);
        assert!(listing.files.is_empty());
    }

    #[tokio::test]
    async fn test_listing_under_a_path() {
        let dir = tempdir().unwrap();
        let lib = library(&dir);

        lib.store("photos/menu.jpg", b"y".to_vec()).await.unwrap();
        lib.store("photos/team.jpg", b"z".to_vec()).await.unwrap();

        let listing = lib.list("photos").await.unwrap();
        assert_eq!(listing.current_path, "photos/");
        assert_eq!(listing.files.len(), 2);
        assert_eq!(listing.files[0].name, "menu.jpg");
        assert_eq!(
            listing.files[0].url,
            "http://localhost:8300/media/photos/menu.jpg"
        );
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let dir = tempdir().unwrap();
        let lib = library(&dir);

        let err = lib
            .store("../escape.txt", b"x".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
    }

    #[test]
    fn test_s3_backend_is_unimplemented() {
        let result = MediaLibrary::new(
            &ObjectStoreConfig::S3 {
                bucket: "media".to_string(),
                region: "us-east-1".to_string(),
            },
            "http://localhost".to_string(),
        );
        assert!(matches!(result, Err(DeskError::Internal(_))));
    }
}
