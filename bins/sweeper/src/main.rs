//! Retention sweep runner for the blob store.
//!
//! Deletes every record whose last-modified time is at or before
//! `now - retention window`, using the backend's cleanup sweep.
//!
//! Usage:
//!   sweeper [days]   - retention window in days
//!                      (default: BLOBSTORE__RETENTION_DAYS, then 30)

use anyhow::Context;
use chrono::{Duration, Utc};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blobstore::{BlobStorage, ObjectStoreBackend, StorageConfig};

const DEFAULT_RETENTION_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blobstore=info,sweeper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let retention_days = retention_days()?;

    // Load configuration
    let config = StorageConfig::load().context("Failed to load storage configuration")?;
    if config.suppress_deletes {
        warn!("Deletion suppression is active; the sweep will be a no-op");
    }

    let backend =
        ObjectStoreBackend::from_config(config).context("Failed to create storage backend")?;

    let cutoff = Utc::now() - Duration::days(retention_days);
    info!(
        provider = backend.provider_name(),
        bucket = backend.bucket(),
        retention_days,
        %cutoff,
        "Starting retention sweep"
    );

    backend
        .cleanup(cutoff)
        .await
        .context("Retention sweep failed")?;

    info!("Retention sweep complete");
    Ok(())
}

/// Resolve the retention window: CLI argument, then environment, then the
/// default.
fn retention_days() -> anyhow::Result<i64> {
    if let Some(arg) = std::env::args().nth(1) {
        return arg
            .parse()
            .with_context(|| format!("Invalid retention days argument: {arg}"));
    }
    if let Ok(value) = std::env::var("BLOBSTORE__RETENTION_DAYS") {
        return value
            .parse()
            .with_context(|| format!("Invalid BLOBSTORE__RETENTION_DAYS value: {value}"));
    }
    Ok(DEFAULT_RETENTION_DAYS)
}
