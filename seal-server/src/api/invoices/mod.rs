//! Invoice API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/invoices", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/overdue", get(handler::list_overdue))
        .route("/{id}", get(handler::get_by_id))
        .route("/order/{order_id}", get(handler::get_by_order));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_capability(Capability::ManageInvoices)));

    read_routes.merge(manage_routes)
}
