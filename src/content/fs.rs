//! Local-filesystem content service.
//!
//! Single-host variant of the content interface, laid out the same way a
//! storage node lays out its tree: one directory per video id under the
//! base directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::ContentService;
use crate::error::{ContentError, Result};

pub struct FsContentService {
    base_dir: PathBuf,
}

impl FsContentService {
    /// Opens (creating if necessary) the base directory.
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, video_id: &str, filename: &str) -> PathBuf {
        self.base_dir.join(video_id).join(filename)
    }
}

#[async_trait]
impl ContentService for FsContentService {
    async fn read(&self, video_id: &str, filename: &str) -> Result<Bytes> {
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

    async fn write(&self, video_id: &str, filename: &str, data: Bytes) -> Result<()> {
        let video_dir = self.base_dir.join(video_id);
        fs::create_dir_all(&video_dir).await?;
        fs::write(self.file_path(video_id, filename), &data).await?;
        Ok(())
    }

    async fn delete(&self, video_id: &str, filename: &str) -> Result<()> {
        let path = self.file_path(video_id, filename);
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ContentError::NotFound(format!("{video_id}/{filename}"))
            } else {
                ContentError::Io(e)
            }
        })?;

        let _ = fs::remove_dir(self.base_dir.join(video_id)).await;
        Ok(())
    }
}
