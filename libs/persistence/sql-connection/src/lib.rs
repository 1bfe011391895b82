pub mod config;
mod static_vars;

pub use deadpool_postgres::PoolError;
pub use static_vars::connect_postgres_db;
pub use tokio_postgres::Error as PgError;

use deadpool_postgres::{Client, Pool};

/// Cheaply clonable handle to the process-wide Postgres pool.
#[derive(Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub fn from_global() -> Self {
        Self::new(static_vars::global_pool().clone())
    }

    pub async fn get_client(&self) -> Result<Client, PoolError> {
        self.pool.get().await
    }

    /// `(available, size)` for the health check.
    pub fn get_pool_status(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.available, status.size)
    }
}
