//! Time Category Repository

use shared::models::{TimeCategory, TimeCategoryCreate};
use sqlx::SqlitePool;

use super::RepoResult;

pub async fn find_by_id(
    pool: &SqlitePool,
    tenant_id: i64,
    id: i64,
) -> RepoResult<Option<TimeCategory>> {
    let category = sqlx::query_as::<_, TimeCategory>(
        "SELECT id, tenant_id, name, is_active, is_billable_default, default_billing_rate, created_at, updated_at FROM time_category WHERE tenant_id = ? AND id = ?",
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(
    pool: &SqlitePool,
    tenant_id: i64,
    data: TimeCategoryCreate,
) -> RepoResult<TimeCategory> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO time_category (id, tenant_id, name, is_active, is_billable_default, default_billing_rate, created_at, updated_at) VALUES (?, ?, ?, 1, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(&data.name)
    .bind(data.is_billable_default)
    .bind(data.default_billing_rate)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create time category".into()))
}

/// Deactivate a category; historical entries keep referencing it.
pub async fn deactivate(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE time_category SET is_active = 0, updated_at = ? WHERE tenant_id = ? AND id = ?",
    )
    .bind(now)
    .bind(tenant_id)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(super::RepoError::NotFound(format!(
            "Time category {id} not found"
        )));
    }
    Ok(())
}
