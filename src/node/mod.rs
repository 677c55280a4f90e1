//! Storage Node Module
//!
//! A single-host content blob server with a flat two-level namespace
//! (video-id → filename → bytes), exposed over HTTP.
//!
//! ## Core Concepts
//! - **Layout**: One directory per video under the storage dir; one
//!   regular file per object. No sidecar metadata, no manifests.
//! - **Statelessness**: Apart from its directory tree, a node keeps
//!   nothing across restarts, and it never learns about the ring.
//! - **Access**: Five unary RPCs (`Read`, `Write`, `Delete`,
//!   `ListVideoIDs`, `ListFiles`) defined in `protocol` and served by
//!   `handlers`.

pub mod handlers;
pub mod protocol;
pub mod service;
