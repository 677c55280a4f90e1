//! Storage Node API Handlers
//!
//! HTTP endpoints that expose `StorageNode` capabilities to the network.
//! These handlers translate HTTP requests into local disk operations; the
//! error taxonomy maps onto status codes via `ContentError::into_response`
//! (NotFound becomes 404, everything else 500).

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, Path};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::protocol::{
    DeleteResponse, ListFilesResponse, ListVideoIdsResponse, ROUTE_FILE, ROUTE_LIST_FILES,
    ROUTE_LIST_VIDEOS, WriteResponse,
};
use super::service::StorageNode;
use crate::error::ContentError;

/// Builds the node's HTTP router.
pub fn router(node: Arc<StorageNode>) -> Router {
    Router::new()
        .route(
            ROUTE_FILE,
            get(handle_read_file)
                .put(handle_write_file)
                .delete(handle_delete_file),
        )
        .route(ROUTE_LIST_VIDEOS, get(handle_list_video_ids))
        .route(ROUTE_LIST_FILES, get(handle_list_files))
        .layer(Extension(node))
}

async fn handle_read_file(
    Extension(node): Extension<Arc<StorageNode>>,
    Path((video_id, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, ContentError> {
    let data = node.read(&video_id, &filename).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data))
}

async fn handle_write_file(
    Extension(node): Extension<Arc<StorageNode>>,
    Path((video_id, filename)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<WriteResponse>, ContentError> {
    node.write(&video_id, &filename, body).await?;
    Ok(Json(WriteResponse { success: true }))
}

async fn handle_delete_file(
    Extension(node): Extension<Arc<StorageNode>>,
    Path((video_id, filename)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ContentError> {
    node.delete(&video_id, &filename).await?;
    Ok(Json(DeleteResponse { success: true }))
}

async fn handle_list_video_ids(
    Extension(node): Extension<Arc<StorageNode>>,
) -> Result<Json<ListVideoIdsResponse>, ContentError> {
    let video_ids = node.list_video_ids().await?;
    Ok(Json(ListVideoIdsResponse { video_ids }))
}

async fn handle_list_files(
    Extension(node): Extension<Arc<StorageNode>>,
    Path(video_id): Path<String>,
) -> Result<Json<ListFilesResponse>, ContentError> {
    let filenames = node.list_files(&video_id).await?;
    Ok(Json(ListFilesResponse { filenames }))
}
