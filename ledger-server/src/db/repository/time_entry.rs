//! Time Entry Repository

use chrono::NaiveDate;
use shared::models::{ApprovalStatus, TimeEntry};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, tenant_id, employee_id, entry_date, start_time, end_time, duration_minutes, description, billable, billing_rate, billing_amount, project_id, company_id, task_id, category_id, approval_status, approved_by, approved_at, timesheet_id, timezone, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<Option<TimeEntry>> {
    let entry = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {COLUMNS} FROM time_entry WHERE tenant_id = ? AND id = ?"
    ))
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

/// Insert a fully built entry inside a caller-owned transaction.
pub async fn insert(conn: &mut SqliteConnection, entry: &TimeEntry) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO time_entry (id, tenant_id, employee_id, entry_date, start_time, end_time, duration_minutes, description, billable, billing_rate, billing_amount, project_id, company_id, task_id, category_id, approval_status, approved_by, approved_at, timesheet_id, timezone, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.id)
    .bind(entry.tenant_id)
    .bind(entry.employee_id)
    .bind(entry.entry_date)
    .bind(entry.start_time)
    .bind(entry.end_time)
    .bind(entry.duration_minutes)
    .bind(&entry.description)
    .bind(entry.billable)
    .bind(entry.billing_rate)
    .bind(entry.billing_amount)
    .bind(entry.project_id)
    .bind(entry.company_id)
    .bind(entry.task_id)
    .bind(entry.category_id)
    .bind(entry.approval_status)
    .bind(entry.approved_by)
    .bind(entry.approved_at)
    .bind(entry.timesheet_id)
    .bind(&entry.timezone)
    .bind(entry.created_at)
    .bind(entry.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Write back every mutable field of an entry.
pub async fn update(conn: &mut SqliteConnection, entry: &TimeEntry) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE time_entry SET entry_date = ?, start_time = ?, end_time = ?, duration_minutes = ?, description = ?, billable = ?, billing_rate = ?, billing_amount = ?, project_id = ?, company_id = ?, task_id = ?, category_id = ?, approval_status = ?, approved_by = ?, approved_at = ?, timesheet_id = ?, timezone = ?, updated_at = ? WHERE tenant_id = ? AND id = ?",
    )
    .bind(entry.entry_date)
    .bind(entry.start_time)
    .bind(entry.end_time)
    .bind(entry.duration_minutes)
    .bind(&entry.description)
    .bind(entry.billable)
    .bind(entry.billing_rate)
    .bind(entry.billing_amount)
    .bind(entry.project_id)
    .bind(entry.company_id)
    .bind(entry.task_id)
    .bind(entry.category_id)
    .bind(entry.approval_status)
    .bind(entry.approved_by)
    .bind(entry.approved_at)
    .bind(entry.timesheet_id)
    .bind(&entry.timezone)
    .bind(now)
    .bind(entry.tenant_id)
    .bind(entry.id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Time entry {} not found",
            entry.id
        )));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM time_entry WHERE tenant_id = ? AND id = ?")
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Time entry {id} not found")));
    }
    Ok(())
}

pub async fn find_for_employee_date(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    date: NaiveDate,
) -> RepoResult<Vec<TimeEntry>> {
    let entries = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {COLUMNS} FROM time_entry WHERE tenant_id = ? AND employee_id = ? AND entry_date = ? ORDER BY start_time"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// The running clock session, if any (start set, end still NULL).
pub async fn find_open_session(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
) -> RepoResult<Option<TimeEntry>> {
    let entry = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {COLUMNS} FROM time_entry WHERE tenant_id = ? AND employee_id = ? AND start_time IS NOT NULL AND end_time IS NULL LIMIT 1"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

pub async fn find_by_timesheet(
    pool: &SqlitePool,
    tenant_id: i64,
    timesheet_id: i64,
) -> RepoResult<Vec<TimeEntry>> {
    let entries = sqlx::query_as::<_, TimeEntry>(&format!(
        "SELECT {COLUMNS} FROM time_entry WHERE tenant_id = ? AND timesheet_id = ? ORDER BY entry_date, start_time"
    ))
    .bind(tenant_id)
    .bind(timesheet_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Mirror a timesheet transition onto every contained entry.
///
/// This is the single cascade path; every timesheet transition calls it so
/// entries can never show a different status than their locked sheet.
pub async fn cascade_approval(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    timesheet_id: i64,
    status: ApprovalStatus,
    actor_id: Option<i64>,
    at: Option<i64>,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE time_entry SET approval_status = ?, approved_by = ?, approved_at = ?, updated_at = ? WHERE tenant_id = ? AND timesheet_id = ?",
    )
    .bind(status)
    .bind(actor_id)
    .bind(at)
    .bind(now)
    .bind(tenant_id)
    .bind(timesheet_id)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn sum_minutes_for_date(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    date: NaiveDate,
) -> RepoResult<i64> {
    let minutes: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(duration_minutes), 0) FROM time_entry WHERE tenant_id = ? AND employee_id = ? AND entry_date = ?",
    )
    .bind(tenant_id)
    .bind(employee_id)
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(minutes)
}
