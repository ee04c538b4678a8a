//! Payment API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/invoice/{invoice_id}", get(handler::list_by_invoice));

    let record_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_capability(Capability::RecordPayments)));

    read_routes.merge(record_routes)
}
