//! Leave Balance Repository
//!
//! The ledger rows. Mutations are single UPDATE statements that apply the
//! delta and recompute `available_days` from the same row atomically
//! (column references on the right-hand side read the pre-update values),
//! so the conservation law can never be observed broken, and the write
//! lock taken by the UPDATE serializes concurrent mutators.

use shared::models::LeaveBalance;
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, tenant_id, employee_id, leave_type_id, year, allocated_days, used_days, pending_days, available_days, carried_over_days, created_at, updated_at";

pub async fn find(
    pool: &SqlitePool,
    tenant_id: i64,
    employee_id: i64,
    leave_type_id: i64,
    year: i32,
) -> RepoResult<Option<LeaveBalance>> {
    let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
        "SELECT {COLUMNS} FROM leave_balance WHERE tenant_id = ? AND employee_id = ? AND leave_type_id = ? AND year = ?"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .fetch_optional(pool)
    .await?;
    Ok(balance)
}

/// Fetch the row inside a transaction, creating a zeroed one when missing.
pub async fn get_or_create(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    employee_id: i64,
    leave_type_id: i64,
    year: i32,
) -> RepoResult<LeaveBalance> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    // The unique (tenant, employee, type, year) index makes this a no-op
    // when the row already exists.
    sqlx::query(
        "INSERT OR IGNORE INTO leave_balance (id, tenant_id, employee_id, leave_type_id, year, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
        "SELECT {COLUMNS} FROM leave_balance WHERE tenant_id = ? AND employee_id = ? AND leave_type_id = ? AND year = ?"
    ))
    .bind(tenant_id)
    .bind(employee_id)
    .bind(leave_type_id)
    .bind(year)
    .fetch_one(&mut *conn)
    .await?;
    Ok(balance)
}

/// Apply deltas to the raw columns and recompute `available_days` in the
/// same statement. Returns the row after the update.
pub async fn apply_delta(
    conn: &mut SqliteConnection,
    balance_id: i64,
    used_delta: f64,
    pending_delta: f64,
    allocated_delta: f64,
) -> RepoResult<LeaveBalance> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE leave_balance SET \
            used_days = used_days + ?1, \
            pending_days = pending_days + ?2, \
            allocated_days = allocated_days + ?3, \
            available_days = (allocated_days + ?3) + carried_over_days - (used_days + ?1) - (pending_days + ?2), \
            updated_at = ?4 \
         WHERE id = ?5",
    )
    .bind(used_delta)
    .bind(pending_delta)
    .bind(allocated_delta)
    .bind(now)
    .bind(balance_id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Leave balance {balance_id} not found"
        )));
    }

    reload(conn, balance_id).await
}

/// Recompute and persist the derived column without changing the raw ones.
/// Callers of `get_balance` never read a stale derived value.
pub async fn recompute_available(
    conn: &mut SqliteConnection,
    balance_id: i64,
) -> RepoResult<LeaveBalance> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE leave_balance SET available_days = allocated_days + carried_over_days - used_days - pending_days, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(balance_id)
    .execute(&mut *conn)
    .await?;

    reload(conn, balance_id).await
}

/// Seed the yearly allocation when it has not been set yet.
pub async fn set_allocated_if_unset(
    conn: &mut SqliteConnection,
    balance_id: i64,
    allocated_days: f64,
) -> RepoResult<LeaveBalance> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE leave_balance SET \
            allocated_days = ?1, \
            available_days = ?1 + carried_over_days - used_days - pending_days, \
            updated_at = ?2 \
         WHERE id = ?3 AND allocated_days = 0",
    )
    .bind(allocated_days)
    .bind(now)
    .bind(balance_id)
    .execute(&mut *conn)
    .await?;

    reload(conn, balance_id).await
}

async fn reload(conn: &mut SqliteConnection, balance_id: i64) -> RepoResult<LeaveBalance> {
    let balance = sqlx::query_as::<_, LeaveBalance>(&format!(
        "SELECT {COLUMNS} FROM leave_balance WHERE id = ?"
    ))
    .bind(balance_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(balance)
}
