//! Leave Type Repository

use shared::models::{LeaveType, LeaveTypeCreate};
use sqlx::SqlitePool;

use super::RepoResult;

pub async fn find_by_id(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<Option<LeaveType>> {
    let leave_type = sqlx::query_as::<_, LeaveType>(
        "SELECT id, tenant_id, name, requires_approval, accrual_rate, accrual_frequency, max_days_per_year, is_active, created_at, updated_at FROM leave_type WHERE tenant_id = ? AND id = ?",
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(leave_type)
}

pub async fn find_active(pool: &SqlitePool, tenant_id: i64) -> RepoResult<Vec<LeaveType>> {
    let types = sqlx::query_as::<_, LeaveType>(
        "SELECT id, tenant_id, name, requires_approval, accrual_rate, accrual_frequency, max_days_per_year, is_active, created_at, updated_at FROM leave_type WHERE tenant_id = ? AND is_active = 1 ORDER BY name",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(types)
}

pub async fn create(pool: &SqlitePool, tenant_id: i64, data: LeaveTypeCreate) -> RepoResult<LeaveType> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO leave_type (id, tenant_id, name, requires_approval, accrual_rate, accrual_frequency, max_days_per_year, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(&data.name)
    .bind(data.requires_approval)
    .bind(data.accrual_rate)
    .bind(data.accrual_frequency)
    .bind(data.max_days_per_year)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create leave type".into()))
}
