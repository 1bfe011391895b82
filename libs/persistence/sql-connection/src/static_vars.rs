use std::sync::OnceLock;

use anyhow::Context;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tracing::info;

use crate::config::PostgresDbConfig;

static SQL_POOL: OnceLock<Pool> = OnceLock::new();

/// Build the global pool and verify connectivity with a probe query.
pub async fn connect_postgres_db(
    config: &PostgresDbConfig,
) -> anyhow::Result<()> {
    let pg_config: tokio_postgres::Config = config
        .uri
        .parse()
        .context("invalid DATABASE_URL")?;

    let manager = Manager::from_config(pg_config, NoTls, ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    let mut builder = Pool::builder(manager);
    if let Some(max_conn) = config.max_conn {
        builder = builder.max_size(max_conn as usize);
    }
    let pool = builder.build().context("failed to build postgres pool")?;

    let client = pool.get().await.context("postgres is not reachable")?;
    client.simple_query("SELECT 1").await?;
    drop(client);

    SQL_POOL
        .set(pool)
        .map_err(|_| anyhow::anyhow!("postgres pool already initialized"))?;

    info!("postgres connection pool initialized");
    Ok(())
}

pub(crate) fn global_pool() -> &'static Pool {
    SQL_POOL
        .get()
        .expect("postgres pool not initialized, call connect_postgres_db first")
}
