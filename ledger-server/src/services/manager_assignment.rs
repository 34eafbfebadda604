//! Manager Assignment Service
//!
//! Effective-dated employee→manager history. The history only moves
//! forward: a new assignment closes the current interval the day before
//! its effective date and opens a new one. The single exception is a
//! correction on the current interval's own start day, which rewrites the
//! manager in place instead of appending a zero-length interval.
//!
//! `employee.manager_id` is a derived cache of this history, synced here
//! and nowhere else, and only when the effective date is not in the
//! future.

use chrono::{Duration, NaiveDate};
use shared::models::ManagerAssignment;
use sqlx::SqliteConnection;

use crate::core::ServerState;
use crate::db::repository::{self, manager_assignment};
use crate::utils::{AppError, AppResult};

/// Assign `manager_id` to `employee_id` effective from the given day.
pub async fn assign(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    manager_id: i64,
    effective_from: NaiveDate,
) -> AppResult<ManagerAssignment> {
    check_participants(state, tenant_id, employee_id, manager_id).await?;
    let today = today(state);

    let mut tx = state.pool().begin().await?;
    let assignment = assign_in_tx(
        &mut tx,
        tenant_id,
        employee_id,
        manager_id,
        effective_from,
        today,
    )
    .await?;
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            None,
            crate::audit::AuditAction::ManagerAssigned,
            "employee",
            employee_id,
            serde_json::json!({ "manager_id": manager_id, "effective_from": effective_from }),
        )
        .await;

    Ok(assignment)
}

/// Assign one manager to many employees in a single transaction; any
/// failure rolls back every assignment.
pub async fn assign_many(
    state: &ServerState,
    tenant_id: i64,
    manager_id: i64,
    employee_ids: &[i64],
    effective_from: NaiveDate,
) -> AppResult<Vec<ManagerAssignment>> {
    for employee_id in employee_ids {
        check_participants(state, tenant_id, *employee_id, manager_id).await?;
    }
    let today = today(state);

    let mut tx = state.pool().begin().await?;
    let mut assignments = Vec::with_capacity(employee_ids.len());
    for employee_id in employee_ids {
        let assignment = assign_in_tx(
            &mut tx,
            tenant_id,
            *employee_id,
            manager_id,
            effective_from,
            today,
        )
        .await?;
        assignments.push(assignment);
    }
    tx.commit().await?;

    for assignment in &assignments {
        state
            .audit
            .record(
                tenant_id,
                None,
                crate::audit::AuditAction::ManagerAssigned,
                "employee",
                assignment.employee_id,
                serde_json::json!({ "manager_id": manager_id, "effective_from": effective_from }),
            )
            .await;
    }

    Ok(assignments)
}

/// The manager responsible for `employee_id` on `date`: the containing
/// history interval, or the denormalized cache for pre-history data.
pub async fn manager_for_date(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    date: NaiveDate,
) -> AppResult<Option<i64>> {
    if let Some(assignment) =
        manager_assignment::find_for_date(state.pool(), tenant_id, employee_id, date).await?
    {
        return Ok(Some(assignment.manager_id));
    }

    let employee = repository::employee::find_by_id(state.pool(), tenant_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;
    Ok(employee.manager_id)
}

async fn assign_in_tx(
    conn: &mut SqliteConnection,
    tenant_id: i64,
    employee_id: i64,
    manager_id: i64,
    effective_from: NaiveDate,
    today: NaiveDate,
) -> AppResult<ManagerAssignment> {
    let open = manager_assignment::find_open(conn, tenant_id, employee_id).await?;

    let assignment = match open {
        None => {
            let assignment = new_open_row(tenant_id, employee_id, manager_id, effective_from);
            manager_assignment::insert(conn, &assignment).await?;
            assignment
        }
        Some(current) if current.effective_from == effective_from => {
            // Same-day correction: rewrite in place, idempotent for the
            // same manager.
            manager_assignment::update_manager(conn, tenant_id, current.id, manager_id).await?;
            ManagerAssignment {
                manager_id,
                ..current
            }
        }
        Some(current) if effective_from < current.effective_from => {
            return Err(AppError::business_rule(
                "Effective date must be on or after the current assignment start",
            ));
        }
        Some(current) => {
            manager_assignment::close(
                conn,
                tenant_id,
                current.id,
                effective_from - Duration::days(1),
            )
            .await?;
            let assignment = new_open_row(tenant_id, employee_id, manager_id, effective_from);
            manager_assignment::insert(conn, &assignment).await?;
            assignment
        }
    };

    // Sync the cache only for currently-effective history, never for
    // future-dated changes.
    if effective_from <= today {
        repository::employee::set_manager(conn, tenant_id, employee_id, Some(manager_id)).await?;
    }

    Ok(assignment)
}

async fn check_participants(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    manager_id: i64,
) -> AppResult<()> {
    let employee = repository::employee::find_by_id(state.pool(), tenant_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;
    let manager = repository::employee::find_by_id(state.pool(), tenant_id, manager_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Manager {manager_id} not found")))?;
    if employee.tenant_id != manager.tenant_id {
        return Err(AppError::business_rule(
            "Employee and manager must belong to the same tenant",
        ));
    }
    Ok(())
}

fn new_open_row(
    tenant_id: i64,
    employee_id: i64,
    manager_id: i64,
    effective_from: NaiveDate,
) -> ManagerAssignment {
    let now = shared::util::now_millis();
    ManagerAssignment {
        id: shared::util::snowflake_id(),
        tenant_id,
        employee_id,
        manager_id,
        effective_from,
        effective_to: None,
        created_at: now,
        updated_at: now,
    }
}

fn today(state: &ServerState) -> NaiveDate {
    crate::utils::time::millis_to_date(shared::util::now_millis(), state.config.engine.timezone)
}
