//! Stock API Handlers

use axum::{
    Json,
    extract::{Extension, Query, State},
};

use crate::api::PageQuery;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{damage, grn, stock};
use crate::utils::AppResult;
use shared::models::{Grn, GrnCreate, StockAlert, StockDamage, StockDamageCreate, StockLevel};

/// GET /api/stock - counters for every product
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StockLevel>>> {
    let levels = stock::list(&state.pool).await?;
    Ok(Json(levels))
}

/// GET /api/stock/alerts - active products below their threshold
pub async fn alerts(State(state): State<ServerState>) -> AppResult<Json<Vec<StockAlert>>> {
    let alerts = stock::alerts(&state.pool).await?;
    Ok(Json(alerts))
}

pub async fn list_grns(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<Grn>>> {
    let (limit, offset) = page.bounds();
    let grns = grn::find_all(&state.pool, limit, offset).await?;
    Ok(Json(grns))
}

/// POST /api/stock/grn - goods received note
pub async fn receive(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<GrnCreate>,
) -> AppResult<Json<Grn>> {
    let grn = state.fulfillment.receive_stock(&user.actor(), payload).await?;
    Ok(Json(grn))
}

pub async fn list_damage(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<Vec<StockDamage>>> {
    let (limit, offset) = page.bounds();
    let damages = damage::find_all(&state.pool, limit, offset).await?;
    Ok(Json(damages))
}

pub async fn record_damage(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<StockDamageCreate>,
) -> AppResult<Json<StockDamage>> {
    let damage = state.fulfillment.record_damage(&user.actor(), payload).await?;
    Ok(Json(damage))
}

