//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment marker that suppresses all destructive operations for the
/// process. Checked once when a config is loaded; presence alone counts,
/// the value is ignored.
pub const SUPPRESS_DELETES_ENV: &str = "BLOBSTORE_SUPPRESS_DELETES";

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID. Falls back to ambient identity
        /// (environment variables or instance roles) when omitted.
        #[serde(default)]
        access_key_id: Option<String>,
        /// AWS secret access key. Falls back to ambient identity when omitted.
        #[serde(default)]
        secret_access_key: Option<String>,
        /// AWS region. Falls back to the store default when omitted.
        #[serde(default)]
        region: Option<String>,
        /// Alternate endpoint URL, for S3-compatible services that are not
        /// the default S3 host.
        #[serde(default)]
        endpoint: Option<String>,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create an S3 provider that resolves credentials, region, and
    /// endpoint from ambient identity.
    #[must_use]
    pub fn s3(bucket: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            access_key_id: None,
            secret_access_key: None,
            region: None,
            endpoint: None,
        }
    }

    /// Create an S3-compatible provider with explicit connection
    /// parameters (Cloudflare R2, Supabase, MinIO).
    #[must_use]
    pub fn s3_compatible(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            region: Some(region.into()),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create an Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create a local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Suppress all destructive operations (delete, delete_multi,
    /// cleanup). Frozen into the backend at construction; suppressed
    /// operations still report success.
    #[serde(default)]
    pub suppress_deletes: bool,
    /// Maximum attempt count for the client-side retry policy.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: usize,
}

fn default_retry_max_attempts() -> usize {
    StorageConfig::DEFAULT_RETRY_MAX_ATTEMPTS
}

impl StorageConfig {
    /// Default maximum retry attempts for transient store failures.
    pub const DEFAULT_RETRY_MAX_ATTEMPTS: usize = 10;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            suppress_deletes: false,
            retry_max_attempts: Self::DEFAULT_RETRY_MAX_ATTEMPTS,
        }
    }

    /// Set the deletion gate.
    #[must_use]
    pub fn with_suppress_deletes(mut self, suppress: bool) -> Self {
        self.suppress_deletes = suppress;
        self
    }

    /// Set the maximum retry attempt count.
    #[must_use]
    pub fn with_retry_max_attempts(mut self, attempts: usize) -> Self {
        self.retry_max_attempts = attempts;
        self
    }

    /// Loads configuration from environment and config files.
    ///
    /// Sources, in order: `config/storage.toml` (optional), then
    /// environment variables with the `BLOBSTORE` prefix
    /// (`BLOBSTORE__PROVIDER__TYPE=s3`, `BLOBSTORE__PROVIDER__BUCKET=...`).
    /// The [`SUPPRESS_DELETES_ENV`] marker, if present, forces the
    /// deletion gate on regardless of other sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/storage").required(false))
            .add_source(config::Environment::with_prefix("BLOBSTORE").separator("__"))
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;
        if Self::suppress_deletes_from_env() {
            loaded.suppress_deletes = true;
        }
        Ok(loaded)
    }

    /// Whether the process-wide deletion-suppression marker is set.
    #[must_use]
    pub fn suppress_deletes_from_env() -> bool {
        std::env::var_os(SUPPRESS_DELETES_ENV).is_some()
    }
}
