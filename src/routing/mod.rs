//! Content Routing Module
//!
//! The client-side half of the distributed content store.
//!
//! ## Core Concepts
//! - **Placement**: `HashRing` maps every placement key
//!   (`"{video_id}/{filename}"`) to exactly one storage node. Ownership
//!   is deterministic across routers sharing a membership view.
//! - **Dispatch**: `NetworkContentService` resolves the owner under a
//!   shared lock and forwards the operation over that node's
//!   long-lived `NodeClient` channel.
//! - **Rebalancing**: `AddNode`/`RemoveNode` take the lock exclusively,
//!   mutate the ring, and physically migrate displaced objects between
//!   nodes with `Read → Write → Delete` triples.
//! - **Admin surface**: `admin` serves the membership RPCs over HTTP;
//!   `protocol` defines their wire contracts.

pub mod admin;
pub mod client;
pub mod protocol;
pub mod ring;
pub mod router;

#[cfg(test)]
mod tests;
