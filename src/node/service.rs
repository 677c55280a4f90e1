//! Single-host content blob store.
//!
//! A storage node materializes its state as a two-level directory tree,
//! `<storage-dir>/<video-id>/<filename>`, with the raw object bytes as
//! file contents. The node holds no knowledge of the ring; it serves
//! whatever it is asked to store.

use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;

use crate::error::{ContentError, Result};

pub struct StorageNode {
    storage_dir: PathBuf,
}

impl StorageNode {
    /// Opens (creating if necessary) the storage directory.
    pub async fn new(storage_dir: impl Into<PathBuf>) -> Result<Self> {
        let storage_dir = storage_dir.into();
        fs::create_dir_all(&storage_dir).await?;
        Ok(Self { storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn file_path(&self, video_id: &str, filename: &str) -> PathBuf {
        self.storage_dir.join(video_id).join(filename)
    }

    pub async fn read(&self, video_id: &str, filename: &str) -> Result<Bytes> {
        let path = self.file_path(video_id, filename);
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ContentError::NotFound(format!("{video_id}/{filename}"))
            } else {
                ContentError::Io(e)
            }
        })?;
        Ok(Bytes::from(data))
    }

    /// Stores an object, overwriting any previous version.
    ///
    /// The replacement is atomic from the reader's perspective: bytes land
    /// in a temporary file in the video directory which is then renamed
    /// over the destination.
    pub async fn write(&self, video_id: &str, filename: &str, data: Bytes) -> Result<()> {
        let path = self.file_path(video_id, filename);
        let video_dir = self.storage_dir.join(video_id);
        fs::create_dir_all(&video_dir).await?;

        let temp = tempfile::NamedTempFile::new_in(&video_dir)?;
        fs::write(temp.path(), &data).await?;
        temp.persist(&path).map_err(|e| ContentError::Io(e.error))?;
        fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).await?;
        Ok(())
    }

    /// Removes an object, then opportunistically removes the video
    /// directory if it became empty. A non-empty directory is left alone.
    pub async fn delete(&self, video_id: &str, filename: &str) -> Result<()> {
        let path = self.file_path(video_id, filename);
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ContentError::NotFound(format!("{video_id}/{filename}"))
            } else {
                ContentError::Io(e)
            }
        })?;

        let _ = fs::remove_dir(self.storage_dir.join(video_id)).await;
        Ok(())
    }

    /// Names of every directory directly under the storage dir.
    pub async fn list_video_ids(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.storage_dir).await?;
        let mut video_ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                video_ids.push(name.to_string());
            }
        }

        Ok(video_ids)
    }

    /// Regular-file entries inside one video directory. A missing
    /// directory yields an empty list, not an error.
    pub async fn list_files(&self, video_id: &str) -> Result<Vec<String>> {
        let video_dir = self.storage_dir.join(video_id);
        let mut entries = match fs::read_dir(&video_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut filenames = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file()
                && let Some(name) = entry.file_name().to_str()
            {
                filenames.push(name.to_string());
            }
        }

        Ok(filenames)
    }
}
