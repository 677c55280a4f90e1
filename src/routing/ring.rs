//! Placement Ring
//!
//! Responsible for mapping placement keys to the storage node that owns
//! them. Ownership must be deterministic: every router that sees the same
//! membership computes the same owner for a key.
//!
//! ## Mechanism
//! - **Hashing**: Addresses and keys are hashed with SHA-256; the leading
//!   8 bytes, read big-endian, form a position on a 64-bit ring. This exact
//!   definition is part of the external contract.
//! - **Placement**: The owner of a key is the member with the smallest hash
//!   greater than or equal to the key's hash, wrapping around to the
//!   smallest member hash.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::error::ContentError;

/// Hashes a string to its position on the ring.
///
/// SHA-256 of the UTF-8 bytes, leading 8 bytes as a big-endian u64.
pub fn hash_string_to_u64(s: &str) -> u64 {
    let digest = Sha256::digest(s.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// The consistent-hash ring of storage node addresses.
///
/// `hashes` is kept strictly ascending; `nodes` is a bijection between
/// ring positions and addresses. Mutated only by admin operations.
#[derive(Debug, Default)]
pub struct HashRing {
    hashes: Vec<u64>,
    nodes: HashMap<u64, String>,
}

impl HashRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node address to the ring.
    ///
    /// Rejects an already-occupied position: a duplicate address, or the
    /// degenerate case of two distinct addresses hashing to the same slot.
    pub fn insert(&mut self, address: &str) -> Result<(), ContentError> {
        let hash = hash_string_to_u64(address);
        let idx = self.hashes.partition_point(|&h| h < hash);
        if self.hashes.get(idx) == Some(&hash) {
            return Err(ContentError::Config(format!(
                "ring position collision for node {address}"
            )));
        }

        self.hashes.insert(idx, hash);
        self.nodes.insert(hash, address.to_string());
        Ok(())
    }

    /// Removes a node address from the ring.
    pub fn remove(&mut self, address: &str) -> Result<(), ContentError> {
        let hash = hash_string_to_u64(address);
        match self.hashes.binary_search(&hash) {
            Ok(idx) if self.nodes.get(&hash).is_some_and(|a| a == address) => {
                self.hashes.remove(idx);
                self.nodes.remove(&hash);
                Ok(())
            }
            _ => Err(ContentError::NotFound(format!("node {address}"))),
        }
    }

    /// Returns the address owning `key`, or `None` when the ring is empty.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.owner_at(hash_string_to_u64(key))
    }

    /// Returns the owner of `key` as if `excluded` were not a member.
    ///
    /// Computed directly over the remaining members; the ring itself is
    /// not mutated.
    pub fn lookup_excluding(&self, key: &str, excluded: &str) -> Option<&str> {
        if self.hashes.is_empty() {
            return None;
        }

        let hash = hash_string_to_u64(key);
        let start = self.hashes.partition_point(|&h| h < hash);
        for offset in 0..self.hashes.len() {
            let slot = self.hashes[(start + offset) % self.hashes.len()];
            let address = self.nodes.get(&slot).map(String::as_str)?;
            if address != excluded {
                return Some(address);
            }
        }

        None
    }

    pub fn contains(&self, address: &str) -> bool {
        let hash = hash_string_to_u64(address);
        self.nodes.get(&hash).is_some_and(|a| a == address)
    }

    /// Member addresses in ascending hash order.
    pub fn addresses(&self) -> Vec<String> {
        self.hashes
            .iter()
            .filter_map(|hash| self.nodes.get(hash).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    fn owner_at(&self, hash: u64) -> Option<&str> {
        if self.hashes.is_empty() {
            return None;
        }

        let idx = self.hashes.partition_point(|&h| h < hash);
        let slot = if idx == self.hashes.len() {
            self.hashes[0]
        } else {
            self.hashes[idx]
        };
        self.nodes.get(&slot).map(String::as_str)
    }
}
