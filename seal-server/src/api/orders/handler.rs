//! Sales Order API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, order};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{OrderCancel, OrderCreate, OrderDetail, OrderStatus, SalesOrder};

/// POST /api/orders - create an order, issue its serials, reserve stock
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.fulfillment.create_order(&user.actor(), payload).await?;
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// GET /api/orders?status= - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SalesOrder>>> {
    let orders = order::find_all(&state.pool, query.status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - order with its items
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let mut conn = state.pool.acquire().await.map_err(RepoError::from)?;
    let detail = order::find_detail(&mut conn, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        })?;
    Ok(Json(detail))
}

/// GET /api/orders/customer/{customer_id}
pub async fn list_by_customer(
    State(state): State<ServerState>,
    Path(customer_id): Path<i64>,
) -> AppResult<Json<Vec<SalesOrder>>> {
    let orders = order::find_by_customer(&state.pool, customer_id).await?;
    Ok(Json(orders))
}

/// POST /api/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderCancel>,
) -> AppResult<Json<SalesOrder>> {
    let order = state.fulfillment.cancel_order(&user.actor(), id, payload).await?;
    Ok(Json(order))
}
