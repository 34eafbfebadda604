//! Timesheet Service — the weekly approval workflow
//!
//! Timesheets are created lazily when the first entry of a period needs
//! one. Every status transition runs through the [`TimesheetStatus`] state
//! machine and mirrors its result onto the contained entries via the
//! single [`cascade_status`] helper, so an entry can never show a
//! different state than its locked sheet.

use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};
use shared::models::{ApprovalStatus, Timesheet, TimesheetStatus, TimesheetTotals};
use sqlx::SqliteConnection;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::repository::{self, time_entry, timesheet};
use crate::utils::validation::MIN_REJECTION_REASON_LEN;
use crate::utils::{AppError, AppResult, time};

/// The weekly period containing `date`, honoring the configured first day
/// of the week.
pub fn period_for(date: NaiveDate, first_day: Weekday) -> (NaiveDate, NaiveDate) {
    time::week_period(date, first_day)
}

/// Submission deadline: period end + configured offset days, at the
/// configured time of day in the business timezone, truncated to the
/// minute.
pub fn deadline_for(state: &ServerState, period_end: NaiveDate) -> i64 {
    let engine = &state.config.engine;
    let due_date = period_end + Duration::days(engine.deadline_offset_days);
    time::date_hms_to_millis(
        due_date,
        engine.deadline_time.hour(),
        engine.deadline_time.minute(),
        0,
        engine.timezone,
    )
}

/// The timesheet for the period containing `date`, created as DRAFT when
/// it does not exist yet. A new sheet is pre-populated with the manager
/// effective at the period end and the computed deadline.
pub async fn get_or_create_for_date(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    date: NaiveDate,
) -> AppResult<Timesheet> {
    repository::employee::find_by_id(state.pool(), tenant_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;

    let (period_start, period_end) = period_for(date, state.config.engine.first_day_of_week);
    if let Some(existing) =
        timesheet::find_by_period(state.pool(), tenant_id, employee_id, period_start, period_end)
            .await?
    {
        return Ok(existing);
    }

    let approver =
        super::manager_assignment::manager_for_date(state, tenant_id, employee_id, period_end)
            .await?;
    let now = shared::util::now_millis();
    let sheet = Timesheet {
        id: shared::util::snowflake_id(),
        tenant_id,
        employee_id,
        period_start,
        period_end,
        status: TimesheetStatus::Draft,
        approver_id: approver,
        deadline: Some(deadline_for(state, period_end)),
        submitted_at: None,
        approved_at: None,
        rejected_at: None,
        rejection_reason: None,
        locked_at: None,
        locked_by: None,
        created_at: now,
        updated_at: now,
    };

    // A concurrent creator may win the unique period index; fall back to
    // its row.
    match timesheet::insert(state.pool(), &sheet).await {
        Ok(()) => Ok(sheet),
        Err(_) => timesheet::find_by_period(
            state.pool(),
            tenant_id,
            employee_id,
            period_start,
            period_end,
        )
        .await?
        .ok_or_else(|| AppError::database("Failed to create timesheet")),
    }
}

/// Submit for approval. Only the owning employee's user may submit; an
/// approved sheet must be unlocked first; the configured minimum daily
/// minutes must be met on every weekday of the period.
pub async fn submit(
    state: &ServerState,
    tenant_id: i64,
    timesheet_id: i64,
    actor_id: i64,
) -> AppResult<Timesheet> {
    let mut sheet = fetch(state, tenant_id, timesheet_id).await?;

    let employee = repository::employee::find_by_id(state.pool(), tenant_id, sheet.employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", sheet.employee_id)))?;
    if let Some(user_id) = employee.user_id
        && user_id != actor_id
    {
        return Err(AppError::business_rule(
            "Only the timesheet's own employee can submit it",
        ));
    }

    let next = sheet.status.submit()?;
    check_min_daily_minutes(state, &sheet).await?;

    let now = shared::util::now_millis();
    sheet.status = next;
    sheet.submitted_at = Some(now);
    sheet.approver_id = super::manager_assignment::manager_for_date(
        state,
        tenant_id,
        sheet.employee_id,
        sheet.period_end,
    )
    .await?;
    sheet.rejected_at = None;
    sheet.rejection_reason = None;
    sheet.approved_at = None;
    sheet.locked_at = None;
    sheet.locked_by = None;

    let mut tx = state.pool().begin().await?;
    timesheet::update_workflow(&mut tx, &sheet).await?;
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            Some(actor_id),
            AuditAction::TimesheetSubmitted,
            "timesheet",
            sheet.id,
            serde_json::json!({ "status": sheet.status }),
        )
        .await;

    Ok(sheet)
}

/// Approve a pending timesheet and lock it. The cascade to contained
/// entries commits atomically with the sheet itself; the notification is
/// dispatched after the commit and never rolls it back.
pub async fn approve(
    state: &ServerState,
    tenant_id: i64,
    timesheet_id: i64,
    approver_id: i64,
) -> AppResult<Timesheet> {
    let mut sheet = fetch(state, tenant_id, timesheet_id).await?;
    let next = sheet.status.approve()?;

    let now = shared::util::now_millis();
    sheet.status = next;
    sheet.approver_id = Some(approver_id);
    sheet.approved_at = Some(now);
    sheet.rejected_at = None;
    sheet.rejection_reason = None;
    sheet.locked_at = Some(now);
    sheet.locked_by = Some(approver_id);

    let mut tx = state.pool().begin().await?;
    timesheet::update_workflow(&mut tx, &sheet).await?;
    cascade_status(
        &mut tx,
        &sheet,
        ApprovalStatus::Approved,
        Some(approver_id),
        Some(now),
    )
    .await?;
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            Some(approver_id),
            AuditAction::TimesheetApproved,
            "timesheet",
            sheet.id,
            serde_json::json!({ "status": sheet.status }),
        )
        .await;
    if let Err(e) = state.notifier.timesheet_approved(&sheet).await {
        tracing::warn!(timesheet_id = sheet.id, "approval notification failed: {}", e);
    }

    Ok(sheet)
}

/// Reject a pending timesheet with a substantive reason.
pub async fn reject(
    state: &ServerState,
    tenant_id: i64,
    timesheet_id: i64,
    approver_id: i64,
    reason: &str,
) -> AppResult<Timesheet> {
    if reason.trim().len() < MIN_REJECTION_REASON_LEN {
        return Err(AppError::validation(
            "rejection_reason",
            format!("Rejection reason must be at least {MIN_REJECTION_REASON_LEN} characters."),
        ));
    }

    let mut sheet = fetch(state, tenant_id, timesheet_id).await?;
    let next = sheet.status.reject()?;

    let now = shared::util::now_millis();
    sheet.status = next;
    sheet.approver_id = Some(approver_id);
    sheet.rejected_at = Some(now);
    sheet.rejection_reason = Some(reason.trim().to_string());
    sheet.approved_at = None;
    sheet.locked_at = None;
    sheet.locked_by = None;

    let mut tx = state.pool().begin().await?;
    timesheet::update_workflow(&mut tx, &sheet).await?;
    cascade_status(&mut tx, &sheet, ApprovalStatus::Rejected, None, None).await?;
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            Some(approver_id),
            AuditAction::TimesheetRejected,
            "timesheet",
            sheet.id,
            serde_json::json!({ "status": sheet.status, "reason": sheet.rejection_reason }),
        )
        .await;
    if let Err(e) = state.notifier.timesheet_rejected(&sheet, reason).await {
        tracing::warn!(timesheet_id = sheet.id, "rejection notification failed: {}", e);
    }

    Ok(sheet)
}

/// Unlock an approved timesheet, the only path back from APPROVED. Fully
/// reverses the approve cascade.
pub async fn unlock(
    state: &ServerState,
    tenant_id: i64,
    timesheet_id: i64,
    actor_id: i64,
) -> AppResult<Timesheet> {
    let mut sheet = fetch(state, tenant_id, timesheet_id).await?;
    let next = sheet.status.unlock()?;

    sheet.status = next;
    sheet.approved_at = None;
    sheet.locked_at = None;
    sheet.locked_by = None;

    let mut tx = state.pool().begin().await?;
    timesheet::update_workflow(&mut tx, &sheet).await?;
    cascade_status(&mut tx, &sheet, ApprovalStatus::Pending, None, None).await?;
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            Some(actor_id),
            AuditAction::TimesheetUnlocked,
            "timesheet",
            sheet.id,
            serde_json::json!({ "status": sheet.status }),
        )
        .await;

    Ok(sheet)
}

/// Aggregate total/billable/non-billable minutes and the per-day map over
/// every contained entry.
pub async fn totals(
    state: &ServerState,
    tenant_id: i64,
    timesheet_id: i64,
) -> AppResult<TimesheetTotals> {
    let sheet = fetch(state, tenant_id, timesheet_id).await?;
    let entries = time_entry::find_by_timesheet(state.pool(), tenant_id, sheet.id).await?;

    let mut totals = TimesheetTotals::default();
    for entry in &entries {
        totals.total_minutes += entry.duration_minutes;
        if entry.billable {
            totals.billable_minutes += entry.duration_minutes;
        } else {
            totals.non_billable_minutes += entry.duration_minutes;
        }
        *totals.per_day.entry(entry.entry_date).or_insert(0) += entry.duration_minutes;
    }
    Ok(totals)
}

pub async fn list_for_employee(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    limit: i32,
    offset: i32,
) -> AppResult<Vec<Timesheet>> {
    Ok(timesheet::list_for_employee(state.pool(), tenant_id, employee_id, limit, offset).await?)
}

pub async fn fetch(state: &ServerState, tenant_id: i64, timesheet_id: i64) -> AppResult<Timesheet> {
    timesheet::find_by_id(state.pool(), tenant_id, timesheet_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Timesheet {timesheet_id} not found")))
}

/// The one cascade path: every timesheet transition mirrors its result
/// onto the contained entries through this function.
async fn cascade_status(
    conn: &mut SqliteConnection,
    sheet: &Timesheet,
    status: ApprovalStatus,
    actor_id: Option<i64>,
    at: Option<i64>,
) -> AppResult<()> {
    let updated =
        time_entry::cascade_approval(conn, sheet.tenant_id, sheet.id, status, actor_id, at).await?;
    tracing::debug!(
        timesheet_id = sheet.id,
        ?status,
        entries = updated,
        "cascaded timesheet status"
    );
    Ok(())
}

/// Enforce the minimum logged minutes on every weekday (Mon-Fri) of the
/// period. Zero disables the rule.
async fn check_min_daily_minutes(state: &ServerState, sheet: &Timesheet) -> AppResult<()> {
    let min = state.config.engine.min_daily_minutes;
    if min <= 0 {
        return Ok(());
    }

    let entries = time_entry::find_by_timesheet(state.pool(), sheet.tenant_id, sheet.id).await?;
    let mut per_day = std::collections::BTreeMap::new();
    for entry in &entries {
        *per_day.entry(entry.entry_date).or_insert(0i64) += entry.duration_minutes;
    }

    let mut day = sheet.period_start;
    while day <= sheet.period_end {
        let is_weekday = !matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        if is_weekday {
            let minutes = per_day.get(&day).copied().unwrap_or(0);
            if minutes < min {
                return Err(AppError::business_rule(format!(
                    "Logged time on {day} is {minutes} minutes, below the required {min}"
                )));
            }
        }
        day += Duration::days(1);
    }
    Ok(())
}
