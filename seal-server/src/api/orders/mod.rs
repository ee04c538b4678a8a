//! Sales Order API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/customer/{customer_id}", get(handler::list_by_customer));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_capability(Capability::ManageOrders)));

    read_routes.merge(manage_routes)
}
