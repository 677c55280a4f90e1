//! Video Metadata Catalog
//!
//! SQLite-backed record of every uploaded video: id and upload time.
//! The catalog is the front-end's source of truth for which videos
//! exist; content placement is handled elsewhere.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;

use crate::error::Result;

/// One uploaded video as known to the catalog.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub id: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Persistent `id → upload-time` store.
pub struct VideoCatalog {
    conn: Mutex<Connection>,
}

impl VideoCatalog {
    /// Opens or creates the catalog database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory catalog (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                id TEXT PRIMARY KEY,
                uploaded_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Records a new video. Fails if the id already exists.
    pub async fn create(&self, id: &str, uploaded_at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO videos (id, uploaded_at) VALUES (?1, ?2)",
            params![id, uploaded_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Looks up one video; `None` if it was never uploaded.
    pub async fn read(&self, id: &str) -> Result<Option<VideoMetadata>> {
        let conn = self.conn.lock().await;
        let row = conn
            .query_row(
                "SELECT id, uploaded_at FROM videos WHERE id = ?1",
                params![id],
                |row| {
                    let id: String = row.get(0)?;
                    let uploaded_at: String = row.get(1)?;
                    Ok((id, uploaded_at))
                },
            )
            .optional()?;

        match row {
            Some((id, uploaded_at)) => Ok(Some(VideoMetadata {
                id,
                uploaded_at: parse_timestamp(&uploaded_at)?,
            })),
            None => Ok(None),
        }
    }

    /// All videos, newest first.
    pub async fn list(&self) -> Result<Vec<VideoMetadata>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT id, uploaded_at FROM videos ORDER BY uploaded_at DESC")?;
        let rows = stmt.query_map([], |row| {
            let id: String = row.get(0)?;
            let uploaded_at: String = row.get(1)?;
            Ok((id, uploaded_at))
        })?;

        let mut videos = Vec::new();
        for row in rows {
            let (id, uploaded_at) = row?;
            videos.push(VideoMetadata {
                id,
                uploaded_at: parse_timestamp(&uploaded_at)?,
            });
        }
        Ok(videos)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| crate::error::ContentError::Metadata(format!("bad timestamp {raw:?}: {e}")))
}
