//! Distributed Video-on-Demand Content Store
//!
//! This library crate defines the core modules of the platform. It serves
//! as the foundation for the binaries (`vod-web`, `storage-node`,
//! `vod-admin`).
//!
//! ## Architecture Modules
//! The system is composed of loosely coupled subsystems:
//!
//! - **`routing`**: The core of the platform. A client-side consistent-hash
//!   router (`NetworkContentService`) that places every
//!   `(video-id, filename)` object on exactly one storage node, plus the
//!   live rebalancing protocol run when membership changes.
//! - **`node`**: The storage node: a single-host blob server exposing a
//!   flat two-level namespace (video-id → filename → bytes) over HTTP.
//! - **`content`**: The `ContentService` contract the web layer consumes,
//!   with a local-filesystem variant for single-host deployments.
//! - **`catalog`**: SQLite-backed video metadata (id → upload time).
//! - **`transcode`**: Wrapper around `ffmpeg` producing DASH manifests
//!   and segments from uploaded sources.
//! - **`web`**: The upload/playback HTTP front-end.
//! - **`error`**: The shared error taxonomy.

pub mod catalog;
pub mod content;
pub mod error;
pub mod node;
pub mod routing;
pub mod transcode;
pub mod web;
