//! Admin API Handlers
//!
//! HTTP endpoints exposing the router's membership operations. Hosted by
//! the web binary on the admin address from the router's options string.
//! A `RebalancePartial` abort still reports the number of files migrated
//! before the failure.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::protocol::{
    AddNodeRequest, AddNodeResponse, ENDPOINT_ADD_NODE, ENDPOINT_LIST_NODES, ENDPOINT_REMOVE_NODE,
    ListNodesResponse, RemoveNodeRequest, RemoveNodeResponse,
};
use super::router::NetworkContentService;
use crate::error::ContentError;

/// Builds the admin HTTP router.
pub fn router(service: Arc<NetworkContentService>) -> Router {
    Router::new()
        .route(ENDPOINT_ADD_NODE, post(handle_add_node))
        .route(ENDPOINT_REMOVE_NODE, post(handle_remove_node))
        .route(ENDPOINT_LIST_NODES, get(handle_list_nodes))
        .layer(Extension(service))
}

async fn handle_add_node(
    Extension(service): Extension<Arc<NetworkContentService>>,
    Json(req): Json<AddNodeRequest>,
) -> (StatusCode, Json<AddNodeResponse>) {
    match service.add_node(&req.node_address).await {
        Ok(count) => (
            StatusCode::OK,
            Json(AddNodeResponse {
                migrated_file_count: count as i32,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!("AddNode {} failed: {e}", req.node_address);
            let (status, migrated) = admin_failure(&e);
            (
                status,
                Json(AddNodeResponse {
                    migrated_file_count: migrated,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn handle_remove_node(
    Extension(service): Extension<Arc<NetworkContentService>>,
    Json(req): Json<RemoveNodeRequest>,
) -> (StatusCode, Json<RemoveNodeResponse>) {
    match service.remove_node(&req.node_address).await {
        Ok(count) => (
            StatusCode::OK,
            Json(RemoveNodeResponse {
                migrated_file_count: count as i32,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!("RemoveNode {} failed: {e}", req.node_address);
            let (status, migrated) = admin_failure(&e);
            (
                status,
                Json(RemoveNodeResponse {
                    migrated_file_count: migrated,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn handle_list_nodes(
    Extension(service): Extension<Arc<NetworkContentService>>,
) -> Json<ListNodesResponse> {
    Json(ListNodesResponse {
        nodes: service.list_nodes().await,
    })
}

/// Maps an admin failure onto a status code plus the pre-abort migration
/// count (zero unless the sweep got underway).
fn admin_failure(e: &ContentError) -> (StatusCode, i32) {
    match e {
        ContentError::RebalancePartial { migrated, .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, *migrated as i32)
        }
        ContentError::NotFound(_) => (StatusCode::NOT_FOUND, 0),
        ContentError::Config(_) => (StatusCode::BAD_REQUEST, 0),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, 0),
    }
}
