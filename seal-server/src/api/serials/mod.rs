//! Serial Number API (lookups)

mod handler;

use axum::{Router, middleware, routing::get};
use shared::models::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/serials", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/search", get(handler::search))
        .route("/order/{order_id}", get(handler::list_by_order))
        .route("/customer/{customer_id}", get(handler::list_by_customer));

    let damage_routes = Router::new()
        .route("/damaged", get(handler::list_damaged))
        .route("/reusable", get(handler::list_reusable))
        .layer(middleware::from_fn(require_capability(Capability::InspectDamage)));

    read_routes.merge(damage_routes)
}
