//! Typed HTTP client for one storage node.
//!
//! One `NodeClient` exists per ring member, created when the node joins
//! and dropped when it leaves. The underlying `reqwest::Client` keeps its
//! connections alive across calls, so all concurrent callers share a
//! single channel per node. Nothing is retried here: placement is
//! authoritative, so a failure on the owner is the caller's failure.

use bytes::Bytes;

use crate::error::{ContentError, Result};
use crate::node::protocol::{
    ListFilesResponse, ListVideoIdsResponse, ROUTE_LIST_VIDEOS, file_path, list_files_path,
};

#[derive(Debug)]
pub struct NodeClient {
    address: String,
    http: reqwest::Client,
}

impl NodeClient {
    /// Opens a client channel to `address` (`host:port`).
    pub fn connect(address: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ContentError::node(address, e))?;

        Ok(Self {
            address: address.to_string(),
            http,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    pub async fn read(&self, video_id: &str, filename: &str) -> Result<Bytes> {
        let response = self
            .http
            .get(self.url(&file_path(video_id, filename)))
            .send()
            .await
            .map_err(|e| ContentError::node(&self.address, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound(format!("{video_id}/{filename}")));
        }
        if !response.status().is_success() {
            return Err(ContentError::node(
                &self.address,
                format!("read failed with status {}", response.status()),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|e| ContentError::node(&self.address, e))
    }

    pub async fn write(&self, video_id: &str, filename: &str, data: Bytes) -> Result<()> {
        let response = self
            .http
            .put(self.url(&file_path(video_id, filename)))
            .body(data)
            .send()
            .await
            .map_err(|e| ContentError::node(&self.address, e))?;

        if !response.status().is_success() {
            return Err(ContentError::node(
                &self.address,
                format!("write failed with status {}", response.status()),
            ));
        }

        Ok(())
    }

    pub async fn delete(&self, video_id: &str, filename: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&file_path(video_id, filename)))
            .send()
            .await
            .map_err(|e| ContentError::node(&self.address, e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound(format!("{video_id}/{filename}")));
        }
        if !response.status().is_success() {
            return Err(ContentError::node(
                &self.address,
                format!("delete failed with status {}", response.status()),
            ));
        }

        Ok(())
    }

    pub async fn list_video_ids(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.url(ROUTE_LIST_VIDEOS))
            .send()
            .await
            .map_err(|e| ContentError::node(&self.address, e))?;

        if !response.status().is_success() {
            return Err(ContentError::node(
                &self.address,
                format!("list video ids failed with status {}", response.status()),
            ));
        }

        let body: ListVideoIdsResponse = response
            .json()
            .await
            .map_err(|e| ContentError::node(&self.address, e))?;
        Ok(body.video_ids)
    }

    pub async fn list_files(&self, video_id: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.url(&list_files_path(video_id)))
            .send()
            .await
            .map_err(|e| ContentError::node(&self.address, e))?;

        if !response.status().is_success() {
            return Err(ContentError::node(
                &self.address,
                format!("list files failed with status {}", response.status()),
            ));
        }

        let body: ListFilesResponse = response
            .json()
            .await
            .map_err(|e| ContentError::node(&self.address, e))?;
        Ok(body.filenames)
    }
}
