//! The storage-backend capability trait.
//!
//! The calling application depends only on this trait, never on a concrete
//! backend type. One implementing struct per backend kind; see
//! [`crate::service::ObjectStoreBackend`] for the object-store backend.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// Contract for a blob-storage backend.
///
/// Keys are opaque strings chosen by the caller; values are opaque byte
/// sequences. A key maps to at most one value at any time. The backend is
/// a stateless facade over the store: no cache, no buffered writes, and
/// every method may be invoked concurrently.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// One-time provisioning hook for stores that require it (e.g. bucket
    /// creation). For a pre-existing store this does nothing and never fails.
    async fn bootstrap(&self) -> Result<(), StorageError>;

    /// Fetch the payload stored under `key`.
    ///
    /// Returns `Ok(None)` if the store reports the key does not exist.
    /// Any other retrieval failure is surfaced as an error; it is never
    /// folded into `None`, so callers can rely on the missing-vs-failed
    /// distinction.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError>;

    /// Store `value` under `key`, unconditionally overwriting any existing
    /// value. The write is visible to a subsequent `get` on the same
    /// backend instance.
    ///
    /// `ttl` is accepted for interface compatibility but is NOT translated
    /// into store-side expiry: retention is handled exclusively through
    /// [`BlobStorage::cleanup`]. Passing a ttl is a documented no-op.
    async fn set(
        &self,
        key: &str,
        value: Bytes,
        ttl: Option<Duration>,
    ) -> Result<(), StorageError>;

    /// Fetch several keys at once. Duplicates in `keys` are permitted.
    ///
    /// The result contains exactly one entry per distinct requested key:
    /// present keys map to their payload, absent keys map to `None`.
    /// If any individual fetch fails for a real error (not "not found"),
    /// the whole call fails; the result is complete or absent, never
    /// partially silent.
    async fn get_multi(
        &self,
        keys: &[String],
    ) -> Result<HashMap<String, Option<Bytes>>, StorageError>;

    /// Remove the value stored under `key`. Deleting an already-absent key
    /// is a success. No-op (returning `Ok`) when the deletion gate is
    /// active.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Remove a sequence of keys; logically equivalent to calling
    /// [`BlobStorage::delete`] once per key. Every key in the input is
    /// attempted even if an earlier one fails; if any deletion failed for
    /// a real error the call reports an aggregate failure. No-op when the
    /// deletion gate is active.
    async fn delete_multi(&self, keys: &[String]) -> Result<(), StorageError>;

    /// Delete every record whose store-reported last-modified time is at
    /// or before `cutoff`; records modified strictly after the cutoff are
    /// preserved. No-op when the deletion gate is active.
    ///
    /// This is a full scan of the store: cost grows with the total number
    /// of records, not with the size of the expired subset. The sweep is
    /// not resumable; if interrupted, already-deleted records stay deleted
    /// and the rest wait for the next invocation.
    async fn cleanup(&self, cutoff: DateTime<Utc>) -> Result<(), StorageError>;
}
