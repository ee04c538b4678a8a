//! Seal Server - order fulfillment core for serialized security seals
//!
//! # Modules
//!
//! ```text
//! seal-server/src/
//! ├── core/          # config, state, server, errors
//! ├── auth/          # identity headers, role capabilities
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── fulfillment/   # transactional workflow: serials, ledger, actions
//! └── utils/         # logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod fulfillment;
pub mod utils;

// Re-export public types
pub use auth::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use fulfillment::{FulfillmentError, FulfillmentService, WorkflowAction};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Initialize logging from the loaded config
pub fn setup_environment(config: &Config) {
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
}
