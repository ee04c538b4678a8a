//! Shared fixtures for the integration tests
//!
//! Each test gets its own WAL database file in a temp dir so several pool
//! connections can write concurrently.

#![allow(dead_code)]

use seal_server::db::repository::{customer, product};
use seal_server::{Config, DbService, ServerState};
use shared::models::{
    Actor, GrnCreate, OrderCreate, OrderItemInput, PrintingType, ProductCreate, Role,
};
use tempfile::TempDir;

pub struct TestEnv {
    pub state: ServerState,
    // Keeps the database file alive
    _dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_connections(4).await
    }

    pub async fn with_connections(max_connections: u32) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seal-test.db");
        let config = Config {
            database_path: path.to_string_lossy().into_owned(),
            http_port: 0,
            environment: "test".into(),
            log_level: "warn".into(),
            log_dir: None,
            tx_timeout_ms: 10_000,
            db_max_connections: max_connections,
        };
        let db = DbService::new(&config.database_path, max_connections)
            .await
            .unwrap();
        Self {
            state: ServerState::new(config, db.pool),
            _dir: dir,
        }
    }

    pub async fn customer(&self, name: &str) -> i64 {
        customer::create(&self.state.pool, name, Some("ops@example.com"))
            .await
            .unwrap()
    }

    /// Active product with `on_hand` units received through a GRN
    pub async fn product(&self, name: &str, on_hand: i64) -> i64 {
        let mut conn = self.state.pool.acquire().await.unwrap();
        let product = product::create(
            &mut conn,
            ProductCreate {
                name: name.to_string(),
                description: None,
                unit_price: 12.0,
                minimum_threshold: Some(20),
            },
        )
        .await
        .unwrap();
        drop(conn);

        if on_hand > 0 {
            self.state
                .fulfillment
                .receive_stock(
                    &store_keeper(),
                    GrnCreate {
                        product_id: product.id,
                        quantity: on_hand,
                        supplier_name: Some("Northern Seals Ltd".into()),
                        notes: None,
                    },
                )
                .await
                .unwrap();
        }
        product.id
    }
}

pub fn admin() -> Actor {
    Actor::new(1, Role::Admin)
}

pub fn director() -> Actor {
    Actor::new(2, Role::Director)
}

pub fn store_keeper() -> Actor {
    Actor::new(3, Role::StoreKeeper)
}

pub fn operator() -> Actor {
    Actor::new(4, Role::PrintingOperator)
}

pub fn cashier() -> Actor {
    Actor::new(5, Role::Cashier)
}

pub fn line(product_id: i64, quantity: i64, start: &str, end: &str) -> OrderItemInput {
    OrderItemInput {
        product_id,
        quantity,
        unit_price: 1.5,
        total_price: None,
        serial_start: start.to_string(),
        serial_end: end.to_string(),
        printing_type: PrintingType::NormalSerial,
    }
}

pub fn order(customer_id: i64, items: Vec<OrderItemInput>) -> OrderCreate {
    OrderCreate {
        customer_id,
        quotation_id: None,
        order_date: None,
        items,
    }
}
