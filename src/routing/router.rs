//! Network content service: the client-side router.
//!
//! Wraps the placement ring and the per-node client pool behind a single
//! read-write lock. Data-plane calls (`read`/`write`/`delete`) take the
//! lock shared so many front-end handlers can dispatch in parallel;
//! admin calls (`add_node`/`remove_node`) take it exclusively for the
//! whole procedure, so no reader ever observes a half-mutated ring and
//! no write can escape a rebalancing sweep.
//!
//! Migration of one object is strictly `Read → Write → Delete`. The
//! source copy is never deleted before the destination write has been
//! acknowledged, so a failure mid-triple leaves at worst a duplicate.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::client::NodeClient;
use super::ring::HashRing;
use crate::content::ContentService;
use crate::error::{ContentError, Result};

/// Forms the unit of hashing for one object.
pub fn placement_key(video_id: &str, filename: &str) -> String {
    format!("{video_id}/{filename}")
}

#[derive(Debug)]
struct RingState {
    ring: HashRing,
    clients: HashMap<String, NodeClient>,
}

impl RingState {
    fn client(&self, address: &str) -> Result<&NodeClient> {
        self.clients
            .get(address)
            .ok_or_else(|| ContentError::Config(format!("no client channel for node {address}")))
    }

    fn owner_for(&self, key: &str) -> Result<&NodeClient> {
        let address = self
            .ring
            .lookup(key)
            .ok_or(ContentError::NoNodesAvailable)?;
        self.client(address)
    }
}

/// The distributed content service consumed by the web front-end.
#[derive(Debug)]
pub struct NetworkContentService {
    admin_addr: String,
    state: RwLock<RingState>,
}

impl NetworkContentService {
    /// Builds the router from its options string:
    /// `"admin-addr,node1,node2,…"`. The first element is the admin RPC
    /// listen address; the rest are the seed storage nodes, joined in
    /// declaration order.
    pub fn from_options(options: &str) -> Result<Self> {
        let parts: Vec<&str> = options.split(',').map(str::trim).collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(ContentError::Config(format!(
                "invalid options format: {options:?} (expected \"admin-addr,node1,…\")"
            )));
        }

        let admin_addr = parts[0].to_string();
        let mut state = RingState {
            ring: HashRing::new(),
            clients: HashMap::new(),
        };

        for node in &parts[1..] {
            if state.clients.contains_key(*node) {
                return Err(ContentError::Config(format!("duplicate node address {node}")));
            }
            state.ring.insert(node)?;
            state.clients.insert(node.to_string(), NodeClient::connect(node)?);
        }

        Ok(Self {
            admin_addr,
            state: RwLock::new(state),
        })
    }

    /// Listen address for the admin RPC service.
    pub fn admin_addr(&self) -> &str {
        &self.admin_addr
    }

    pub async fn read(&self, video_id: &str, filename: &str) -> Result<Bytes> {
        let state = self.state.read().await;
        let client = state.owner_for(&placement_key(video_id, filename))?;
        client.read(video_id, filename).await
    }

    pub async fn write(&self, video_id: &str, filename: &str, data: Bytes) -> Result<()> {
        let state = self.state.read().await;
        let client = state.owner_for(&placement_key(video_id, filename))?;
        client.write(video_id, filename, data).await
    }

    pub async fn delete(&self, video_id: &str, filename: &str) -> Result<()> {
        let state = self.state.read().await;
        let client = state.owner_for(&placement_key(video_id, filename))?;
        client.delete(video_id, filename).await
    }

    /// Current membership in ascending hash order.
    pub async fn list_nodes(&self) -> Vec<String> {
        self.state.read().await.ring.addresses()
    }

    /// Joins `address` to the ring and migrates every key whose owner
    /// under the updated ring is the new node. Returns the migration
    /// count.
    ///
    /// A failure mid-sweep aborts with `RebalancePartial`; the insertion
    /// stays committed and already-migrated files stay where they landed.
    pub async fn add_node(&self, address: &str) -> Result<u32> {
        let mut state = self.state.write().await;
        if state.clients.contains_key(address) {
            return Err(ContentError::Config(format!(
                "node {address} is already a member"
            )));
        }

        let client = NodeClient::connect(address)?;
        state.ring.insert(address)?;
        state.clients.insert(address.to_string(), client);

        let mut migrated = 0u32;
        match Self::sweep_into(&state, address, &mut migrated).await {
            Ok(()) => Ok(migrated),
            Err(source) => Err(ContentError::RebalancePartial {
                migrated,
                source: Box::new(source),
            }),
        }
    }

    /// Drains `address` and removes it from the ring. Every key it holds
    /// is migrated to its owner under the ring without the node. Returns
    /// the migration count.
    ///
    /// The membership change commits only after the sweep completes; a
    /// failure aborts with `RebalancePartial` and leaves the node in the
    /// ring.
    pub async fn remove_node(&self, address: &str) -> Result<u32> {
        let mut state = self.state.write().await;
        if !state.clients.contains_key(address) {
            return Err(ContentError::NotFound(format!("node {address}")));
        }

        let mut migrated = 0u32;
        match Self::sweep_out_of(&state, address, &mut migrated).await {
            Ok(()) => {
                state.ring.remove(address)?;
                state.clients.remove(address);
                Ok(migrated)
            }
            Err(source) => Err(ContentError::RebalancePartial {
                migrated,
                source: Box::new(source),
            }),
        }
    }

    /// Enumerates every pre-existing node and moves the keys now owned by
    /// `new_addr`. Migrated keys are recorded so a duplicate enumeration
    /// cannot double-move an object.
    async fn sweep_into(state: &RingState, new_addr: &str, migrated: &mut u32) -> Result<()> {
        let new_client = state.client(new_addr)?;
        let mut moved: HashSet<String> = HashSet::new();

        let sources: Vec<String> = state
            .ring
            .addresses()
            .into_iter()
            .filter(|a| a != new_addr)
            .collect();

        for src in &sources {
            let src_client = state.client(src)?;
            for video_id in src_client.list_video_ids().await? {
                for filename in src_client.list_files(&video_id).await? {
                    let key = placement_key(&video_id, &filename);
                    if moved.contains(&key) {
                        continue;
                    }
                    if state.ring.lookup(&key) != Some(new_addr) {
                        continue;
                    }

                    let data = src_client.read(&video_id, &filename).await?;
                    new_client.write(&video_id, &filename, data).await?;
                    src_client.delete(&video_id, &filename).await?;

                    moved.insert(key.clone());
                    *migrated += 1;
                    tracing::info!("[MIGRATE-ADD] {key} from {src} to {new_addr}");
                }
            }
        }

        Ok(())
    }

    /// Moves every key on `address` to its owner under the ring without
    /// that node. A key with no alternative owner aborts the sweep.
    async fn sweep_out_of(state: &RingState, address: &str, migrated: &mut u32) -> Result<()> {
        let src_client = state.client(address)?;
        let mut moved: HashSet<String> = HashSet::new();

        for video_id in src_client.list_video_ids().await? {
            for filename in src_client.list_files(&video_id).await? {
                let key = placement_key(&video_id, &filename);
                if moved.contains(&key) {
                    continue;
                }

                let target = state
                    .ring
                    .lookup_excluding(&key, address)
                    .ok_or(ContentError::NoNodesAvailable)?;
                let target_client = state.client(target)?;

                let data = src_client.read(&video_id, &filename).await?;
                target_client.write(&video_id, &filename, data).await?;
                src_client.delete(&video_id, &filename).await?;

                moved.insert(key.clone());
                *migrated += 1;
                tracing::info!("[MIGRATE-REMOVE] {key} from {address} to {target}");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ContentService for NetworkContentService {
    async fn read(&self, video_id: &str, filename: &str) -> Result<Bytes> {
        NetworkContentService::read(self, video_id, filename).await
    }

    async fn write(&self, video_id: &str, filename: &str, data: Bytes) -> Result<()> {
        NetworkContentService::write(self, video_id, filename, data).await
    }

    async fn delete(&self, video_id: &str, filename: &str) -> Result<()> {
        NetworkContentService::delete(self, video_id, filename).await
    }
}
