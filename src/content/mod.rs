//! Content Service Interface
//!
//! The contract the web front-end consumes: per-object read, write, and
//! delete keyed by `(video_id, filename)`. Two implementations exist —
//! the distributed router (`routing::router::NetworkContentService`) and
//! the single-host filesystem variant (`FsContentService`).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

pub mod fs;

pub use fs::FsContentService;


/// Video content storage as seen by the front-end.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Returns the object's bytes, or `NotFound`.
    async fn read(&self, video_id: &str, filename: &str) -> Result<Bytes>;

    /// Stores the object, overwriting any previous version.
    async fn write(&self, video_id: &str, filename: &str, data: Bytes) -> Result<()>;

    /// Removes the object; `NotFound` if it does not exist.
    async fn delete(&self, video_id: &str, filename: &str) -> Result<()>;
}
