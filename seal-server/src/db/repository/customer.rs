//! Customer Repository (read side, plus seeding)

use super::RepoResult;
use shared::models::Customer;
use sqlx::SqliteExecutor;

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT id, company_name, email, phone, status, created_at FROM customer WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(customer)
}

pub async fn create(
    db: impl SqliteExecutor<'_>,
    company_name: &str,
    email: Option<&str>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO customer (company_name, email, status, created_at) VALUES (?, ?, 'active', ?) \
         RETURNING id",
    )
    .bind(company_name)
    .bind(email)
    .bind(now)
    .fetch_one(db)
    .await?;
    Ok(id)
}
