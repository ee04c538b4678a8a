//! Goods Received Note Repository

use super::RepoResult;
use shared::models::Grn;
use sqlx::SqliteExecutor;

const SELECT_GRN: &str =
    "SELECT id, grn_number, product_id, quantity, supplier_name, received_at, received_by, notes \
     FROM grn";

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Grn>> {
    let grn = sqlx::query_as::<_, Grn>(&format!("{SELECT_GRN} WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(grn)
}

pub async fn find_all(
    db: impl SqliteExecutor<'_>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Grn>> {
    let grns = sqlx::query_as::<_, Grn>(&format!(
        "{SELECT_GRN} ORDER BY received_at DESC, id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(grns)
}

pub async fn insert(
    db: impl SqliteExecutor<'_>,
    grn_number: &str,
    product_id: i64,
    quantity: i64,
    supplier_name: Option<&str>,
    received_by: i64,
    notes: Option<&str>,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO grn (grn_number, product_id, quantity, supplier_name, received_at, \
         received_by, notes) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(grn_number)
    .bind(product_id)
    .bind(quantity)
    .bind(supplier_name)
    .bind(shared::util::now_millis())
    .bind(received_by)
    .bind(notes)
    .fetch_one(db)
    .await?;
    Ok(id)
}
