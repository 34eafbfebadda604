//! Absence Repository

use chrono::NaiveDate;
use shared::models::{Absence, AbsenceStatus};
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

const COLUMNS: &str = "id, tenant_id, employee_id, leave_type_id, start_date, end_date, duration_days, status, approver_id, approved_at, rejection_reason, notes, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<Option<Absence>> {
    let absence = sqlx::query_as::<_, Absence>(&format!(
        "SELECT {COLUMNS} FROM absence WHERE tenant_id = ? AND id = ?"
    ))
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(absence)
}

pub async fn insert(conn: &mut SqliteConnection, absence: &Absence) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO absence (id, tenant_id, employee_id, leave_type_id, start_date, end_date, duration_days, status, approver_id, approved_at, rejection_reason, notes, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(absence.id)
    .bind(absence.tenant_id)
    .bind(absence.employee_id)
    .bind(absence.leave_type_id)
    .bind(absence.start_date)
    .bind(absence.end_date)
    .bind(absence.duration_days)
    .bind(absence.status)
    .bind(absence.approver_id)
    .bind(absence.approved_at)
    .bind(&absence.rejection_reason)
    .bind(&absence.notes)
    .bind(absence.created_at)
    .bind(absence.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Write back the mutable fields of an absence, but only while the
/// stored status still equals `expected`. Returns false when another
/// writer transitioned the row first, making status checks race-free.
pub async fn update_if_status(
    conn: &mut SqliteConnection,
    absence: &Absence,
    expected: AbsenceStatus,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE absence SET start_date = ?, end_date = ?, duration_days = ?, status = ?, approver_id = ?, approved_at = ?, rejection_reason = ?, notes = ?, updated_at = ? WHERE tenant_id = ? AND id = ? AND status = ?",
    )
    .bind(absence.start_date)
    .bind(absence.end_date)
    .bind(absence.duration_days)
    .bind(absence.status)
    .bind(absence.approver_id)
    .bind(absence.approved_at)
    .bind(&absence.rejection_reason)
    .bind(&absence.notes)
    .bind(now)
    .bind(absence.tenant_id)
    .bind(absence.id)
    .bind(expected)
    .execute(&mut *conn)
    .await?;

    Ok(rows.rows_affected() > 0)
}

/// Non-cancelled absences whose inclusive date range intersects
/// [start_date, end_date], excluding `exclude_id` when editing.
///
/// Inclusive intersection: `a.start <= b.end AND a.end >= b.start`.
pub async fn find_overlapping(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    exclude_id: Option<i64>,
) -> RepoResult<Vec<Absence>> {
    let absences = sqlx::query_as::<_, Absence>(&format!(
        "SELECT {COLUMNS} FROM absence WHERE tenant_id = ? AND employee_id = ? AND status != 'CANCELLED' AND start_date <= ? AND end_date >= ? AND id != ? ORDER BY start_date"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(end_date)
    .bind(start_date)
    .bind(exclude_id.unwrap_or(0))
    .fetch_all(pool)
    .await?;
    Ok(absences)
}

/// All absences intersecting the range, regardless of status — the
/// reporting variant of the overlap query (inclusive semantics too).
pub async fn find_in_range(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> RepoResult<Vec<Absence>> {
    let absences = sqlx::query_as::<_, Absence>(&format!(
        "SELECT {COLUMNS} FROM absence WHERE tenant_id = ? AND employee_id = ? AND start_date <= ? AND end_date >= ? ORDER BY start_date"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(end_date)
    .bind(start_date)
    .fetch_all(pool)
    .await?;
    Ok(absences)
}

pub async fn list_for_employee(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Absence>> {
    let absences = sqlx::query_as::<_, Absence>(&format!(
        "SELECT {COLUMNS} FROM absence WHERE tenant_id = ? AND employee_id = ? ORDER BY start_date DESC LIMIT ? OFFSET ?"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(absences)
}
