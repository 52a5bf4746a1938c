//! Object-store backend implementation using Apache OpenDAL.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use futures::future;
use opendal::layers::RetryLayer;
use opendal::{ErrorKind, Operator, services};

use crate::backend::BlobStorage;
use crate::config::{StorageConfig, StorageProvider};
use crate::error::{KeyFailure, StorageError};

/// Blob-storage backend over a remote object store.
///
/// Stateless beyond the operator handle and the deletion gate: no cache,
/// no buffered writes, no in-process locking. Concurrent callers are not
/// coordinated; concurrent writers to the same key resolve to last writer
/// wins, per the underlying store's consistency model.
pub struct ObjectStoreBackend {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectStoreBackend {
    /// Create a new backend from configuration.
    ///
    /// Wraps the underlying client in a bounded-retry layer (jittered
    /// backoff, at most `retry_max_attempts` tries) so transient network
    /// failures are absorbed below this backend's API. The deletion gate
    /// is frozen here for the lifetime of the instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?.layer(
            RetryLayer::new()
                .with_max_times(config.retry_max_attempts)
                .with_jitter(),
        );
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                bucket,
                access_key_id,
                secret_access_key,
                region,
                endpoint,
            } => {
                // Omitted parameters fall back to ambient identity
                // (environment variables, instance roles) or store defaults.
                let mut builder = services::S3::default().bucket(bucket);
                if let Some(access_key_id) = access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }
                if let Some(region) = region {
                    builder = builder.region(region);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Whether destructive operations are suppressed for this instance.
    #[must_use]
    pub fn suppress_deletes(&self) -> bool {
        self.config.suppress_deletes
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Fetch a single key, normalizing "not found" to `None`.
    async fn fetch(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        match self.operator.read(key).await {
            Ok(buffer) => Ok(Some(buffer.to_bytes())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Delete a single key without consulting the deletion gate.
    /// An already-absent key is a success.
    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.operator.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Delete every key in `keys`, attempting all of them even when some
    /// fail, then report the failures in aggregate.
    async fn remove_all(&self, keys: &[String]) -> Result<(), StorageError> {
        let attempts = keys.iter().map(|key| async move {
            let outcome = self.remove(key).await;
            (key, outcome)
        });

        let failures: Vec<KeyFailure> = future::join_all(attempts)
            .await
            .into_iter()
            .filter_map(|(key, outcome)| {
                outcome.err().map(|e| KeyFailure {
                    key: key.clone(),
                    message: e.to_string(),
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(StorageError::partial(failures))
        }
    }

    /// Enumerate the whole store and collect the keys of records whose
    /// last-modified time is at or before `cutoff`. Records the store
    /// reports without a last-modified time are skipped.
    async fn expired_keys(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, StorageError> {
        let mut lister = self
            .operator
            .lister_with("")
            .recursive(true)
            .await
            .map_err(StorageError::from)?;

        let mut expired = Vec::new();
        while let Some(entry) = lister.try_next().await.map_err(StorageError::from)? {
            if !entry.metadata().mode().is_file() {
                continue;
            }
            // Listings are not guaranteed to carry timestamps for every
            // service, so stat each object for an authoritative one.
            let meta = self
                .operator
                .stat(entry.path())
                .await
                .map_err(StorageError::from)?;
            if let Some(last_modified) = meta.last_modified()
                && DateTime::<Utc>::from(std::time::SystemTime::from(last_modified)) <= cutoff
            {
                expired.push(entry.path().to_string());
            }
        }
        Ok(expired)
    }
}

#[async_trait]
impl BlobStorage for ObjectStoreBackend {
    /// No provisioning is required for a pre-existing store.
    async fn bootstrap(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        self.fetch(key).await
    }

    async fn set(
        &self,
        key: &str,
        value: Bytes,
        _ttl: Option<Duration>,
    ) -> Result<(), StorageError> {
        // ttl is intentionally ignored; retention is cleanup's job.
        self.operator
            .write(key, value)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn get_multi(
        &self,
        keys: &[String],
    ) -> Result<HashMap<String, Option<Bytes>>, StorageError> {
        let fetches = distinct_keys(keys).into_iter().map(|key| async move {
            let value = self.fetch(&key).await?;
            Ok::<_, StorageError>((key, value))
        });

        // Complete-or-failed: one real fetch error fails the whole call,
        // so the caller never sees a result set with silent gaps.
        let pairs = future::try_join_all(fetches).await?;
        Ok(pairs.into_iter().collect())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.config.suppress_deletes {
            return Ok(());
        }
        self.remove(key).await
    }

    async fn delete_multi(&self, keys: &[String]) -> Result<(), StorageError> {
        if self.config.suppress_deletes {
            return Ok(());
        }
        self.remove_all(keys).await
    }

    async fn cleanup(&self, cutoff: DateTime<Utc>) -> Result<(), StorageError> {
        if self.config.suppress_deletes {
            return Ok(());
        }
        // Scan, then delete. The two phases are not atomic against
        // concurrent writers; a record written during the sweep may or may
        // not be deleted depending on where the scan cursor is.
        let expired = self.expired_keys(cutoff).await?;
        self.remove_all(&expired).await
    }
}

/// Deduplicate keys, preserving first-seen order.
fn distinct_keys(keys: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.iter()
        .filter(|key| seen.insert(key.as_str()))
        .cloned()
        .collect()
}
