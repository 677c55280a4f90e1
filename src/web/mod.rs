//! Web Front-End Module
//!
//! The upload/playback HTTP surface. Thin glue over the catalog, the
//! transcoder, and whichever `ContentService` the binary was configured
//! with (local filesystem or the distributed router).

pub mod handlers;
pub mod pages;
