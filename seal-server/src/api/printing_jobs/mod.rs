//! Printing Job API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use shared::models::Capability;

use crate::auth::require_capability;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/printing-jobs", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/order/{order_id}", get(handler::list_by_order));

    let schedule_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_capability(Capability::SchedulePrintJobs)));

    let operate_routes = Router::new()
        .route("/mine", get(handler::list_mine))
        .route("/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_capability(Capability::OperatePrinting)));

    read_routes.merge(schedule_routes).merge(operate_routes)
}
