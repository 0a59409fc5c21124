// ============================================================================
// VIBEVERSE - LOCAL STATE SERVICE FOR THE SOCIAL-FEED DEMO
// ============================================================================

// - Likes, saves, follows, comments, created posts and messages
// - Each store mirrored to durable storage after every change
// - Export / import (merge) of the whole state as one JSON document
// - Synthetic catalog of profiles and posts for the feed

pub mod catalog;
pub mod config;
pub mod dto;
pub mod errors;
pub mod feed;
pub mod gateway;
pub mod models;
pub mod routes;
pub mod snapshot;
pub mod states;
pub mod storage;
pub mod store;

pub use gateway::{PostImage, StateGateway};
pub use snapshot::{ImportError, MergeReport, Snapshot};
pub use states::AppState;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageKey};
