use anyhow::Context;
use tracing::{info, warn};

use paddy_core::config::{StorageBackend, StorageConfig};
use paddy_store::postgres::PgPools;
use paddy_store::Stores;

/// Build the collection stores for the configured backend.
///
/// For PostgreSQL the pools are created lazily and migrations are attempted
/// once. A database that is down at startup does not stop the server; the
/// affected routes answer 500 until it comes back.
pub async fn init_stores(config: &StorageConfig) -> anyhow::Result<Stores> {
    match config.backend {
        StorageBackend::Memory => {
            warn!("STORAGE_BACKEND=memory: records are lost on restart");
            Ok(Stores::memory())
        }
        StorageBackend::Postgres => {
            let pools = PgPools::connect_lazy(config).context("invalid database URL")?;
            info!("PostgreSQL pools ready (max {} connections each)", config.max_connections);

            match pools.migrate().await {
                Ok(()) => info!("Database migrations applied successfully"),
                Err(e) => warn!("Failed to run migrations: {} (continuing without them)", e),
            }
            Ok(Stores::postgres(&pools))
        }
    }
}

/// Apply migrations and exit; used by `paddy-server migrate`.
pub async fn migrate(config: &StorageConfig) -> anyhow::Result<()> {
    if config.backend == StorageBackend::Memory {
        info!("STORAGE_BACKEND=memory: nothing to migrate");
        return Ok(());
    }
    let pools = PgPools::connect_lazy(config).context("invalid database URL")?;
    pools.migrate().await.context("migrations failed")?;
    info!("All migrations applied");
    Ok(())
}
