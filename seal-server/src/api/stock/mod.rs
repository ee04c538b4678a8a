//! Stock API
//!
//! | Path | Method | Capability |
//! |------|--------|------------|
//! | /api/stock | GET | - |
//! | /api/stock/alerts | GET | - |
//! | /api/stock/grn | GET | - |
//! | /api/stock/grn | POST | receive_stock |
//! | /api/stock/damage | GET | - |
//! | /api/stock/damage | POST | receive_stock |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stock", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/alerts", get(handler::alerts))
        .route("/grn", get(handler::list_grns))
        .route("/damage", get(handler::list_damage));

    let store_routes = Router::new()
        .route("/grn", post(handler::receive))
        .route("/damage", post(handler::record_damage))
        .layer(middleware::from_fn(require_capability(Capability::ReceiveStock)));

    read_routes.merge(store_routes)
}
