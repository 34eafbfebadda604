//! Leave Balance Service — the ledger
//!
//! The five primitives below are the only legal ways to move days between
//! the allocated/used/pending buckets; every absence transition calls
//! exactly one of them. Each primitive has an `_in_tx` form so the absence
//! workflow can flip the request row and move the days in one transaction;
//! the pool-level wrappers open their own. The conservation law
//! `available = allocated + carried_over - used - pending` is re-derived
//! inside the same UPDATE that applies the delta, so a concurrent reader
//! can never observe it broken.

use shared::models::{Absence, LeaveBalance};
use sqlx::SqliteConnection;

use crate::core::ServerState;
use crate::db::repository::{self, leave_balance};
use crate::utils::{AppError, AppResult};

/// Fetch the ledger row, creating a zeroed one when missing. The derived
/// `available_days` is recomputed and persisted before returning.
pub async fn get_balance(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    leave_type_id: i64,
    year: i32,
) -> AppResult<LeaveBalance> {
    let mut tx = state.pool().begin().await?;
    let row = leave_balance::get_or_create(&mut tx, tenant_id, employee_id, leave_type_id, year)
        .await?;
    let row = leave_balance::recompute_available(&mut tx, row.id).await?;
    tx.commit().await?;
    Ok(row)
}

/// Hold the requested days against the balance while the request awaits
/// approval. Fails (and rolls back) when the hold would overdraw the
/// balance; the write lock taken by the delta serializes concurrent
/// reservations, so two requests can never both spend the same days.
pub async fn reserve(state: &ServerState, absence: &Absence) -> AppResult<LeaveBalance> {
    let mut tx = state.pool().begin().await?;
    let row = reserve_in_tx(&mut tx, absence).await?;
    tx.commit().await?;
    Ok(row)
}

pub(crate) async fn reserve_in_tx(
    conn: &mut SqliteConnection,
    absence: &Absence,
) -> AppResult<LeaveBalance> {
    let row = apply_in_tx(
        conn,
        absence,
        absence.balance_year(),
        0.0,
        absence.duration_days,
    )
    .await?;
    if row.available_days < 0.0 {
        return Err(AppError::business_rule(format!(
            "Insufficient leave balance: reserving {} days would overdraw the balance",
            absence.duration_days
        )));
    }
    Ok(row)
}

/// Convert a reservation into a permanent used-days deduction (approval
/// of a reservation-requiring absence).
pub async fn commit_reservation(state: &ServerState, absence: &Absence) -> AppResult<LeaveBalance> {
    let mut tx = state.pool().begin().await?;
    let row = commit_reservation_in_tx(&mut tx, absence).await?;
    tx.commit().await?;
    Ok(row)
}

pub(crate) async fn commit_reservation_in_tx(
    conn: &mut SqliteConnection,
    absence: &Absence,
) -> AppResult<LeaveBalance> {
    apply_in_tx(
        conn,
        absence,
        absence.balance_year(),
        absence.duration_days,
        -absence.duration_days,
    )
    .await
}

/// Deduct used days directly, no pending step (leave types that do not
/// require approval).
pub async fn deduct_used(state: &ServerState, absence: &Absence) -> AppResult<LeaveBalance> {
    let mut tx = state.pool().begin().await?;
    let row = deduct_used_in_tx(&mut tx, absence).await?;
    tx.commit().await?;
    Ok(row)
}

pub(crate) async fn deduct_used_in_tx(
    conn: &mut SqliteConnection,
    absence: &Absence,
) -> AppResult<LeaveBalance> {
    apply_in_tx(
        conn,
        absence,
        absence.balance_year(),
        absence.duration_days,
        0.0,
    )
    .await
}

/// Release a still-pending reservation (reject or cancel before approval).
pub async fn release_pending(state: &ServerState, absence: &Absence) -> AppResult<LeaveBalance> {
    let mut tx = state.pool().begin().await?;
    let row = release_pending_in_tx(&mut tx, absence).await?;
    tx.commit().await?;
    Ok(row)
}

pub(crate) async fn release_pending_in_tx(
    conn: &mut SqliteConnection,
    absence: &Absence,
) -> AppResult<LeaveBalance> {
    apply_in_tx(
        conn,
        absence,
        absence.balance_year(),
        0.0,
        -absence.duration_days,
    )
    .await
}

/// Give back the days of an already-approved absence (cancellation).
pub async fn restore_used(state: &ServerState, absence: &Absence) -> AppResult<LeaveBalance> {
    let mut tx = state.pool().begin().await?;
    let row = restore_used_in_tx(&mut tx, absence).await?;
    tx.commit().await?;
    Ok(row)
}

pub(crate) async fn restore_used_in_tx(
    conn: &mut SqliteConnection,
    absence: &Absence,
) -> AppResult<LeaveBalance> {
    apply_in_tx(
        conn,
        absence,
        absence.balance_year(),
        -absence.duration_days,
        0.0,
    )
    .await
}

/// Re-point a pending hold after an edit. Same-year edits apply the raw
/// duration delta in one step (a release+reserve pair would open a window
/// where the availability check can fail the request's own edit); edits
/// that move the request into a different ledger year release the full
/// hold from the old year's row and hold the new duration on the new
/// year's row. `absence` carries the pre-edit dates and duration.
pub(crate) async fn rebook_pending_in_tx(
    conn: &mut SqliteConnection,
    absence: &Absence,
    new_year: i32,
    new_days: f64,
) -> AppResult<LeaveBalance> {
    let old_year = absence.balance_year();
    let row = if new_year == old_year {
        apply_in_tx(
            conn,
            absence,
            old_year,
            0.0,
            new_days - absence.duration_days,
        )
        .await?
    } else {
        apply_in_tx(conn, absence, old_year, 0.0, -absence.duration_days).await?;
        apply_in_tx(conn, absence, new_year, 0.0, new_days).await?
    };
    if row.available_days < 0.0 {
        return Err(AppError::business_rule(
            "Insufficient leave balance for the requested change",
        ));
    }
    Ok(row)
}

/// Ensure a balance row exists for every active leave type and seed its
/// yearly allocation from the type's maximum when not already set.
pub async fn initialize_balances(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    year: i32,
) -> AppResult<Vec<LeaveBalance>> {
    let types = repository::leave_type::find_active(state.pool(), tenant_id).await?;

    let mut tx = state.pool().begin().await?;
    let mut balances = Vec::with_capacity(types.len());
    for leave_type in &types {
        let row =
            leave_balance::get_or_create(&mut tx, tenant_id, employee_id, leave_type.id, year)
                .await?;
        let row = if leave_type.max_days_per_year > 0.0 {
            leave_balance::set_allocated_if_unset(&mut tx, row.id, leave_type.max_days_per_year)
                .await?
        } else {
            leave_balance::recompute_available(&mut tx, row.id).await?
        };
        balances.push(row);
    }
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            None,
            crate::audit::AuditAction::BalancesInitialized,
            "employee",
            employee_id,
            serde_json::json!({ "year": year, "leave_types": types.len() }),
        )
        .await;

    Ok(balances)
}

/// Add one accrual increment to the current year's allocation. Leave
/// types without an accrual rate/frequency are left untouched.
pub async fn accrue(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    leave_type_id: i64,
    year: i32,
) -> AppResult<LeaveBalance> {
    let leave_type = repository::leave_type::find_by_id(state.pool(), tenant_id, leave_type_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave type {leave_type_id} not found")))?;

    let mut tx = state.pool().begin().await?;
    let row = leave_balance::get_or_create(&mut tx, tenant_id, employee_id, leave_type_id, year)
        .await?;
    let row = if leave_type.accrues() {
        leave_balance::apply_delta(&mut tx, row.id, 0.0, 0.0, leave_type.accrual_rate).await?
    } else {
        leave_balance::recompute_available(&mut tx, row.id).await?
    };
    tx.commit().await?;

    if leave_type.accrues() {
        state
            .audit
            .record(
                tenant_id,
                None,
                crate::audit::AuditAction::BalanceAccrued,
                "leave_balance",
                row.id,
                serde_json::json!({ "increment": leave_type.accrual_rate, "year": year }),
            )
            .await;
    }

    Ok(row)
}

async fn apply_in_tx(
    conn: &mut SqliteConnection,
    absence: &Absence,
    year: i32,
    used_delta: f64,
    pending_delta: f64,
) -> AppResult<LeaveBalance> {
    let row = leave_balance::get_or_create(
        conn,
        absence.tenant_id,
        absence.employee_id,
        absence.leave_type_id,
        year,
    )
    .await?;
    Ok(leave_balance::apply_delta(conn, row.id, used_delta, pending_delta, 0.0).await?)
}
