//! Employee Repository

use shared::models::{Employee, EmployeeCreate};
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

pub async fn find_by_id(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT id, tenant_id, display_name, email, user_id, manager_id, default_billing_rate, is_active, created_at, updated_at FROM employee WHERE tenant_id = ? AND id = ?",
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

pub async fn create(pool: &SqlitePool, tenant_id: i64, data: EmployeeCreate) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO employee (id, tenant_id, display_name, email, user_id, default_billing_rate, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(&data.display_name)
    .bind(&data.email)
    .bind(data.user_id)
    .bind(data.default_billing_rate)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create employee".into()))
}

/// Sync the denormalized manager cache. Only the manager-assignment
/// service calls this, and only for non-future-dated changes.
pub async fn set_manager(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    employee_id: i64,
    manager_id: Option<i64>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE employee SET manager_id = ?, updated_at = ? WHERE tenant_id = ? AND id = ?")
        .bind(manager_id)
        .bind(now)
        .bind(tenant_id)
        .bind(employee_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
