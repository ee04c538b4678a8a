use crate::core::Config;
use crate::db::DbService;
use crate::fulfillment::FulfillmentService;
use crate::core::Result;
use sqlx::SqlitePool;

/// Server state - shared by every request handler
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | pool | SQLite pool for reads |
/// | fulfillment | transactional workflow operations |
///
/// Cloning is cheap (pool and service are reference counted).
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub fulfillment: FulfillmentService,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let fulfillment = FulfillmentService::new(pool.clone(), config.tx_timeout());
        Self {
            config,
            pool,
            fulfillment,
        }
    }

    /// Open the database file from the config and run migrations
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path, config.db_max_connections).await?;
        Ok(Self::new(config.clone(), db.pool))
    }
}
