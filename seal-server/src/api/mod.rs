//! HTTP API
//!
//! | Module | Prefix |
//! |--------|--------|
//! | [`health`] | `/health` |
//! | [`orders`] | `/api/orders` |
//! | [`printing_jobs`] | `/api/printing-jobs` |
//! | [`invoices`] | `/api/invoices` |
//! | [`payments`] | `/api/payments` |
//! | [`receipts`] | `/api/receipts` |
//! | [`stock`] | `/api/stock` |
//! | [`serials`] | `/api/serials` |
//!
//! Mutations go through [`FulfillmentService`](crate::fulfillment::FulfillmentService);
//! reads query the repositories on the pool directly.

pub mod health;
pub mod invoices;
pub mod orders;
pub mod payments;
pub mod printing_jobs;
pub mod receipts;
pub mod serials;
pub mod stock;

use axum::{Router, middleware};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

/// `?limit=&offset=` for paged listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Limit clamped to 1..=500 (default 50), offset at least 0
    pub fn bounds(&self) -> (i64, i64) {
        (
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            self.offset.unwrap_or(0).max(0),
        )
    }
}

/// Every route, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(printing_jobs::router())
        .merge(invoices::router())
        .merge(payments::router())
        .merge(receipts::router())
        .merge(stock::router())
        .merge(serials::router())
}

/// Fully configured application (used by the server and by tests)
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // Identity headers → CurrentUser (innermost, runs right before routing)
        .layer(middleware::from_fn(require_auth))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
