//! Blob-storage backend using Apache OpenDAL.
//!
//! This crate persists opaque byte payloads under string keys in a remote
//! object store and exposes a uniform contract (single/bulk get, set,
//! delete, time-based retention cleanup) that a calling application's
//! storage layer depends on without knowing the store's specifics.
//!
//! Supported stores:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 BlobStorage (capability trait)                   │
//! │  bootstrap / get / set / get_multi / delete / delete_multi /    │
//! │  cleanup                                                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │            ObjectStoreBackend (OpenDAL Operator)                 │
//! │  op.read("key")   │ op.write("key", data) │ op.delete("key")    │
//! │  op.lister("")    │ op.stat("key")        │ RetryLayer(10)      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Destructive operations (`delete`, `delete_multi`, `cleanup`) are
//! governed by a deletion gate frozen at construction; with the gate
//! active they are no-ops that still report success.

pub mod backend;
pub mod config;
pub mod error;
pub mod service;

pub use backend::BlobStorage;
pub use config::{SUPPRESS_DELETES_ENV, StorageConfig, StorageProvider};
pub use error::{KeyFailure, StorageError};
pub use service::ObjectStoreBackend;
