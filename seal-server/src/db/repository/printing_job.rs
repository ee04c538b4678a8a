//! Printing Job Repository

use super::RepoResult;
use shared::models::{JobStatus, PrintingJob};
use sqlx::SqliteExecutor;

const SELECT_JOB: &str =
    "SELECT id, job_number, order_id, assigned_to, notes, status, started_at, completed_at, \
     created_at, updated_at FROM printing_job";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<PrintingJob>> {
    let job = sqlx::query_as::<_, PrintingJob>(&format!("{SELECT_JOB} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(job)
}

pub async fn find_by_order(
    db: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<PrintingJob>> {
    let jobs =
        sqlx::query_as::<_, PrintingJob>(&format!("{SELECT_JOB} WHERE order_id = ? ORDER BY id"))
        .bind(order_id)
        .fetch_all(db)
        .await?;
    Ok(jobs)
}

/// Newest first, optionally narrowed to one status
pub async fn find_all(
    db: impl SqliteExecutor<'_>,
    status: Option<JobStatus>,
) -> RepoResult<Vec<PrintingJob>> {
    let jobs = sqlx::query_as::<_, PrintingJob>(&format!(
        "{SELECT_JOB} WHERE ?1 IS NULL OR status = ?1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(status)
    .fetch_all(db)
    .await?;
    Ok(jobs)
}

/// Jobs assigned to one operator, newest first
pub async fn find_by_assignee(
    db: impl SqliteExecutor<'_>,
    user_id: i64,
) -> RepoResult<Vec<PrintingJob>> {
    let jobs = sqlx::query_as::<_, PrintingJob>(&format!(
        "{SELECT_JOB} WHERE assigned_to = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(jobs)
}

pub async fn insert(
    db: impl SqliteExecutor<'_>,
    job_number: &str,
    order_id: i64,
    assigned_to: Option<i64>,
    notes: Option<&str>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO printing_job (job_number, order_id, assigned_to, notes, status, created_at, \
         updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(job_number)
    .bind(order_id)
    .bind(assigned_to)
    .bind(notes)
    .bind(JobStatus::New)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(id)
}

pub async fn touch(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE printing_job SET updated_at = ? WHERE id = ?")
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_progress(
    db: impl SqliteExecutor<'_>,
    id: i64,
    status: JobStatus,
    started_at: Option<i64>,
    completed_at: Option<i64>,
) -> RepoResult<()> {
    sqlx::query(
        "UPDATE printing_job SET status = ?, started_at = ?, completed_at = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(status)
    .bind(started_at)
    .bind(completed_at)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}
