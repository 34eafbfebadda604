//! Timesheet Repository

use chrono::NaiveDate;
use shared::models::Timesheet;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, tenant_id, employee_id, period_start, period_end, status, approver_id, deadline, submitted_at, approved_at, rejected_at, rejection_reason, locked_at, locked_by, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<Option<Timesheet>> {
    let timesheet = sqlx::query_as::<_, Timesheet>(&format!(
        "SELECT {COLUMNS} FROM timesheet WHERE tenant_id = ? AND id = ?"
    ))
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(timesheet)
}

/// Exact-period lookup; the unique index guarantees at most one row.
pub async fn find_by_period(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> RepoResult<Option<Timesheet>> {
    let timesheet = sqlx::query_as::<_, Timesheet>(&format!(
        "SELECT {COLUMNS} FROM timesheet WHERE tenant_id = ? AND employee_id = ? AND period_start = ? AND period_end = ?"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_optional(pool)
    .await?;
    Ok(timesheet)
}

pub async fn insert(pool: &SqlitePool, timesheet: &Timesheet) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO timesheet (id, tenant_id, employee_id, period_start, period_end, status, approver_id, deadline, submitted_at, approved_at, rejected_at, rejection_reason, locked_at, locked_by, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(timesheet.id)
    .bind(timesheet.tenant_id)
    .bind(timesheet.employee_id)
    .bind(timesheet.period_start)
    .bind(timesheet.period_end)
    .bind(timesheet.status)
    .bind(timesheet.approver_id)
    .bind(timesheet.deadline)
    .bind(timesheet.submitted_at)
    .bind(timesheet.approved_at)
    .bind(timesheet.rejected_at)
    .bind(&timesheet.rejection_reason)
    .bind(timesheet.locked_at)
    .bind(timesheet.locked_by)
    .bind(timesheet.created_at)
    .bind(timesheet.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write back the status and workflow metadata of a timesheet.
pub async fn update_workflow(conn: &mut SqliteConnection, timesheet: &Timesheet) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE timesheet SET status = ?, approver_id = ?, deadline = ?, submitted_at = ?, approved_at = ?, rejected_at = ?, rejection_reason = ?, locked_at = ?, locked_by = ?, updated_at = ? WHERE tenant_id = ? AND id = ?",
    )
    .bind(timesheet.status)
    .bind(timesheet.approver_id)
    .bind(timesheet.deadline)
    .bind(timesheet.submitted_at)
    .bind(timesheet.approved_at)
    .bind(timesheet.rejected_at)
    .bind(&timesheet.rejection_reason)
    .bind(timesheet.locked_at)
    .bind(timesheet.locked_by)
    .bind(now)
    .bind(timesheet.tenant_id)
    .bind(timesheet.id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Timesheet {} not found",
            timesheet.id
        )));
    }
    Ok(())
}

pub async fn list_for_employee(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Timesheet>> {
    let timesheets = sqlx::query_as::<_, Timesheet>(&format!(
        "SELECT {COLUMNS} FROM timesheet WHERE tenant_id = ? AND employee_id = ? ORDER BY period_start DESC LIMIT ? OFFSET ?"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(timesheets)
}
