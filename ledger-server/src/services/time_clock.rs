//! Time Clock Service
//!
//! Live session state machine: no session → active (start set, end NULL)
//! → no session. At most one open session per employee; the partial
//! unique index on open sessions backs the service-level check, so even a
//! racing double clock-in cannot commit two open rows.

use serde::{Deserialize, Serialize};
use shared::models::{ApprovalStatus, TimeEntry};

use crate::core::ServerState;
use crate::db::repository::{self, time_entry};
use crate::utils::{AppError, AppResult, time};

/// Clock-in payload: associations and billing hints for the session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockInRequest {
    pub description: Option<String>,
    pub billable: Option<bool>,
    pub billing_rate: Option<f64>,
    pub project_id: Option<i64>,
    pub company_id: Option<i64>,
    pub task_id: Option<i64>,
    pub category_id: Option<i64>,
    pub timezone: Option<String>,
}

/// Open a work session: a time entry with start = now and no end yet.
/// The entry is bound to its period's timesheet immediately, creating the
/// sheet when needed.
pub async fn clock_in(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    request: ClockInRequest,
) -> AppResult<TimeEntry> {
    let pool = state.pool();
    let employee = repository::employee::find_by_id(pool, tenant_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;

    if time_entry::find_open_session(pool, tenant_id, employee_id)
        .await?
        .is_some()
    {
        return Err(AppError::business_rule("Employee is already clocked in"));
    }

    let category = match request.category_id {
        Some(id) => Some(
            repository::time_category::find_by_id(pool, tenant_id, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Time category {id} not found")))?,
        ),
        None => None,
    };
    let project = match request.project_id {
        Some(id) => Some(
            repository::project::find_by_id(pool, tenant_id, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))?,
        ),
        None => None,
    };

    let billable = request
        .billable
        .or(category.as_ref().map(|c| c.is_billable_default))
        .unwrap_or(false);

    // Rate is fixed at clock-in; the amount waits for the duration.
    let rate = if billable {
        Some(super::billing::resolve_rate(
            &super::billing::RateSources {
                override_rate: request.billing_rate,
                category: category.as_ref(),
                project: project.as_ref(),
                employee: Some(&employee),
            },
            &state.config.engine,
        )?)
    } else {
        None
    };

    let now = shared::util::now_millis();
    let tz = request
        .timezone
        .as_deref()
        .and_then(|n| n.parse().ok())
        .unwrap_or(state.config.engine.timezone);
    let entry_date = time::millis_to_date(now, tz);

    let sheet =
        super::timesheet::get_or_create_for_date(state, tenant_id, employee_id, entry_date).await?;

    let entry = TimeEntry {
        id: shared::util::snowflake_id(),
        tenant_id,
        employee_id,
        entry_date,
        start_time: Some(now),
        end_time: None,
        duration_minutes: 0,
        description: request.description,
        billable,
        billing_rate: rate,
        billing_amount: None,
        project_id: request.project_id,
        company_id: request.company_id,
        task_id: request.task_id,
        category_id: request.category_id,
        approval_status: ApprovalStatus::Pending,
        approved_by: None,
        approved_at: None,
        timesheet_id: Some(sheet.id),
        timezone: request.timezone,
        created_at: now,
        updated_at: now,
    };

    let mut tx = state.pool().begin().await?;
    if time_entry::insert(&mut tx, &entry).await.is_err() {
        // Lost the race against another clock-in; the open-session index
        // rejected the second row.
        return Err(AppError::business_rule("Employee is already clocked in"));
    }
    tx.commit().await?;
    Ok(entry)
}

/// Close the active session: end = now, duration derived, approval reset
/// to PENDING, billing recomputed (or cleared for non-billable sessions).
pub async fn clock_out(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    notes: Option<String>,
) -> AppResult<TimeEntry> {
    let mut entry = time_entry::find_open_session(state.pool(), tenant_id, employee_id)
        .await?
        .ok_or_else(|| AppError::business_rule("Employee has no active clock session"))?;

    let now = shared::util::now_millis();
    let start = entry.start_time.unwrap_or(now);

    entry.end_time = Some(now);
    entry.duration_minutes = time::minutes_between(start, now).max(0);
    entry.approval_status = ApprovalStatus::Pending;
    entry.approved_by = None;
    entry.approved_at = None;
    if let Some(notes) = notes {
        entry.description = match entry.description.take() {
            Some(existing) => Some(format!("{existing}\n{notes}")),
            None => Some(notes),
        };
    }

    if entry.billable {
        let rate = match entry.billing_rate {
            Some(rate) => rate,
            None => {
                // No rate captured at clock-in; re-resolve from the
                // session's own associations.
                let employee =
                    repository::employee::find_by_id(state.pool(), tenant_id, employee_id)
                        .await?
                        .ok_or_else(|| {
                            AppError::not_found(format!("Employee {employee_id} not found"))
                        })?;
                let category = match entry.category_id {
                    Some(id) => {
                        repository::time_category::find_by_id(state.pool(), tenant_id, id).await?
                    }
                    None => None,
                };
                let project = match entry.project_id {
                    Some(id) => repository::project::find_by_id(state.pool(), tenant_id, id).await?,
                    None => None,
                };
                super::billing::resolve_rate(
                    &super::billing::RateSources {
                        override_rate: None,
                        category: category.as_ref(),
                        project: project.as_ref(),
                        employee: Some(&employee),
                    },
                    &state.config.engine,
                )?
            }
        };
        entry.billing_rate = Some(rate);
        entry.billing_amount = Some(super::billing::billing_amount(entry.duration_minutes, rate));
    } else {
        entry.billing_rate = None;
        entry.billing_amount = None;
    }

    let mut tx = state.pool().begin().await?;
    time_entry::update(&mut tx, &entry).await?;
    tx.commit().await?;
    Ok(entry)
}

/// The running session for an employee, if any.
pub async fn active_session(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
) -> AppResult<Option<TimeEntry>> {
    Ok(time_entry::find_open_session(state.pool(), tenant_id, employee_id).await?)
}
