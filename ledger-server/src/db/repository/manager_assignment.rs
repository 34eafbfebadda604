//! Manager Assignment Repository
//!
//! The partial unique index on (tenant_id, employee_id) WHERE effective_to
//! IS NULL enforces at most one open interval per employee at the storage
//! layer; `close_open` + `insert` inside one transaction keeps the history
//! contiguous.

use chrono::NaiveDate;
use shared::models::ManagerAssignment;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const COLUMNS: &str =
    "id, tenant_id, employee_id, manager_id, effective_from, effective_to, created_at, updated_at";

/// The currently open interval for an employee, if any.
pub async fn find_open(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    employee_id: i64,
) -> RepoResult<Option<ManagerAssignment>> {
    let assignment = sqlx::query_as::<_, ManagerAssignment>(&format!(
        "SELECT {COLUMNS} FROM manager_assignment WHERE tenant_id = ? AND employee_id = ? AND effective_to IS NULL"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(assignment)
}

/// The interval containing `date`, if any. Point-in-time manager lookup.
pub async fn find_for_date(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    date: NaiveDate,
) -> RepoResult<Option<ManagerAssignment>> {
    let assignment = sqlx::query_as::<_, ManagerAssignment>(&format!(
        "SELECT {COLUMNS} FROM manager_assignment WHERE tenant_id = ? AND employee_id = ? AND effective_from <= ? AND (effective_to IS NULL OR effective_to >= ?) ORDER BY effective_from DESC LIMIT 1"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(date)
    .bind(date)
    .fetch_optional(pool)
    .await?;
    Ok(assignment)
}

pub async fn insert(conn: &mut SqliteConnection, assignment: &ManagerAssignment) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO manager_assignment (id, tenant_id, employee_id, manager_id, effective_from, effective_to, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(assignment.id)
    .bind(assignment.tenant_id)
    .bind(assignment.employee_id)
    .bind(assignment.manager_id)
    .bind(assignment.effective_from)
    .bind(assignment.effective_to)
    .bind(assignment.created_at)
    .bind(assignment.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Close an open interval at `effective_to` (inclusive).
pub async fn close(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    assignment_id: i64,
    effective_to: NaiveDate,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE manager_assignment SET effective_to = ?, updated_at = ? WHERE tenant_id = ? AND id = ? AND effective_to IS NULL",
    )
    .bind(effective_to)
    .bind(now)
    .bind(tenant_id)
    .bind(assignment_id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Open manager assignment {assignment_id} not found"
        )));
    }
    Ok(())
}

/// Same-day correction: rewrite the manager on an existing interval
/// instead of appending a zero-length one.
pub async fn update_manager(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    assignment_id: i64,
    manager_id: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE manager_assignment SET manager_id = ?, updated_at = ? WHERE tenant_id = ? AND id = ?",
    )
    .bind(manager_id)
    .bind(now)
    .bind(tenant_id)
    .bind(assignment_id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Manager assignment {assignment_id} not found"
        )));
    }
    Ok(())
}

/// Full history for an employee, oldest interval first.
pub async fn list_for_employee(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
) -> RepoResult<Vec<ManagerAssignment>> {
    let assignments = sqlx::query_as::<_, ManagerAssignment>(&format!(
        "SELECT {COLUMNS} FROM manager_assignment WHERE tenant_id = ? AND employee_id = ? ORDER BY effective_from"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(assignments)
}
