//! Storage Node Wire Protocol
//!
//! Endpoints and DTOs for the five storage-node RPCs. Object payloads are
//! carried as raw `application/octet-stream` bodies; list results and
//! acknowledgments are JSON.

use serde::{Deserialize, Serialize};

// --- Route templates (server side) ---

/// Read / Write / Delete a single object.
pub const ROUTE_FILE: &str = "/files/{video_id}/{filename}";
/// Enumerate the video IDs present on the node.
pub const ROUTE_LIST_VIDEOS: &str = "/videos";
/// Enumerate the files of one video on the node.
pub const ROUTE_LIST_FILES: &str = "/videos/{video_id}/files";

// --- Path builders (client side) ---

pub fn file_path(video_id: &str, filename: &str) -> String {
    format!("/files/{video_id}/{filename}")
}

pub fn list_files_path(video_id: &str) -> String {
    format!("/videos/{video_id}/files")
}

// --- Data Transfer Objects ---

/// Acknowledgment for a write.
#[derive(Debug, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
}

/// Acknowledgment for a delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Result of enumerating the node's video directories.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListVideoIdsResponse {
    pub video_ids: Vec<String>,
}

/// Result of enumerating one video's files. No ordering is guaranteed.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub filenames: Vec<String>,
}
