//! Printing Job API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::printing_job;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{JobStatus, PrintingJob, PrintingJobCreate, PrintingJobStatusUpdate};

/// POST /api/printing-jobs - schedule a waiting order for printing
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PrintingJobCreate>,
) -> AppResult<Json<PrintingJob>> {
    let job = state.fulfillment.create_printing_job(&user.actor(), payload).await?;
    Ok(Json(job))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<JobStatus>,
}

/// GET /api/printing-jobs?status= - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PrintingJob>>> {
    let jobs = printing_job::find_all(&state.pool, query.status).await?;
    Ok(Json(jobs))
}

/// GET /api/printing-jobs/mine - jobs assigned to the caller
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<PrintingJob>>> {
    let jobs = printing_job::find_by_assignee(&state.pool, user.id).await?;
    Ok(Json(jobs))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PrintingJob>> {
    let job = printing_job::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::PrintingJobNotFound,
            format!("Printing job {id} not found"),
        )
    })?;
    Ok(Json(job))
}

pub async fn list_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<Vec<PrintingJob>>> {
    let jobs = printing_job::find_by_order(&state.pool, order_id).await?;
    Ok(Json(jobs))
}

/// PATCH /api/printing-jobs/{id}/status - `completed` marks the order printed
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<PrintingJobStatusUpdate>,
) -> AppResult<Json<PrintingJob>> {
    let job = state
        .fulfillment
        .update_printing_job_status(&user.actor(), id, payload.status)
        .await?;
    Ok(Json(job))
}
