//! Admin Plane Wire Protocol
//!
//! Endpoints and DTOs for the membership RPCs served by the router.
//! Distinct from the data plane: these calls mutate the ring and trigger
//! rebalancing sweeps.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Adds a storage node to the ring, migrating the keys it now owns.
pub const ENDPOINT_ADD_NODE: &str = "/admin/add_node";
/// Drains and removes a storage node from the ring.
pub const ENDPOINT_REMOVE_NODE: &str = "/admin/remove_node";
/// Lists ring membership in ascending hash order.
pub const ENDPOINT_LIST_NODES: &str = "/admin/list_nodes";

// --- Data Transfer Objects ---

#[derive(Debug, Serialize, Deserialize)]
pub struct AddNodeRequest {
    pub node_address: String,
}

/// Outcome of an `AddNode` call.
///
/// On a mid-migration abort the count still reflects the files moved
/// before the failure; `error` carries the cause.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddNodeResponse {
    pub migrated_file_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveNodeRequest {
    pub node_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveNodeResponse {
    pub migrated_file_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListNodesResponse {
    pub nodes: Vec<String>,
}
