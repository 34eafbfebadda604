//! Time Entry Service
//!
//! CRUD over time entries, always through the validator. Editability is
//! owned by the entry's state (`can_be_edited`), not decided here; billing
//! fields are recomputed or cleared whenever the billable flag or duration
//! changes.

use rust_decimal::prelude::*;
use shared::models::{ApprovalStatus, TimeEntry, TimeEntryInput, TimeEntryUpdate};

use crate::core::ServerState;
use crate::db::repository::time_entry;
use crate::services::validation::EntryContext;
use crate::utils::{AppError, AppResult};

/// Create a validated, priced entry bound to its period's timesheet.
pub async fn create(state: &ServerState, tenant_id: i64, input: TimeEntryInput) -> AppResult<TimeEntry> {
    let ctx = super::validation::validate_time_entry(state, tenant_id, &input, None).await?;

    // entry_date presence is enforced by the validator
    let entry_date = input.entry_date.unwrap_or_default();
    let sheet =
        super::timesheet::get_or_create_for_date(state, tenant_id, input.employee_id, entry_date)
            .await?;

    let status = if state.config.engine.approval_enabled {
        ApprovalStatus::Pending
    } else {
        ApprovalStatus::Approved
    };

    let (rate, amount) = resolve_billing(state, &input, &ctx)?;

    let now = shared::util::now_millis();
    let entry = TimeEntry {
        id: shared::util::snowflake_id(),
        tenant_id,
        employee_id: input.employee_id,
        entry_date,
        start_time: input.start_time,
        end_time: input.end_time,
        duration_minutes: ctx.duration_minutes,
        description: input.description,
        billable: ctx.billable,
        billing_rate: rate,
        billing_amount: amount,
        project_id: input.project_id,
        company_id: input.company_id,
        task_id: input.task_id,
        category_id: input.category_id,
        approval_status: status,
        approved_by: None,
        approved_at: None,
        timesheet_id: Some(sheet.id),
        timezone: input.timezone,
        created_at: now,
        updated_at: now,
    };

    let mut tx = state.pool().begin().await?;
    time_entry::insert(&mut tx, &entry).await?;
    tx.commit().await?;
    Ok(entry)
}

/// Apply a patch to an editable entry. The merged shape is re-validated
/// exactly like a create, excluding the entry itself from overlap checks.
pub async fn update(
    state: &ServerState,
    tenant_id: i64,
    entry_id: i64,
    patch: TimeEntryUpdate,
) -> AppResult<TimeEntry> {
    let mut entry = fetch(state, tenant_id, entry_id).await?;
    if !entry.can_be_edited() {
        return Err(AppError::business_rule("Cannot edit approved time entries"));
    }

    let merged = merge(&entry, patch);
    let ctx =
        super::validation::validate_time_entry(state, tenant_id, &merged, Some(entry.id)).await?;

    let entry_date = merged.entry_date.unwrap_or(entry.entry_date);
    if entry_date != entry.entry_date {
        let sheet =
            super::timesheet::get_or_create_for_date(state, tenant_id, entry.employee_id, entry_date)
                .await?;
        entry.timesheet_id = Some(sheet.id);
    }

    let (rate, amount) = resolve_billing(state, &merged, &ctx)?;

    entry.entry_date = entry_date;
    entry.start_time = merged.start_time;
    entry.end_time = merged.end_time;
    entry.duration_minutes = ctx.duration_minutes;
    entry.description = merged.description;
    entry.billable = ctx.billable;
    entry.billing_rate = rate;
    entry.billing_amount = amount;
    entry.project_id = merged.project_id;
    entry.company_id = merged.company_id;
    entry.task_id = merged.task_id;
    entry.category_id = merged.category_id;
    entry.timezone = merged.timezone;

    let mut tx = state.pool().begin().await?;
    time_entry::update(&mut tx, &entry).await?;
    tx.commit().await?;
    Ok(entry)
}

/// Delete an entry, guarded the same way as edits.
pub async fn delete(state: &ServerState, tenant_id: i64, entry_id: i64) -> AppResult<()> {
    let entry = fetch(state, tenant_id, entry_id).await?;
    if !entry.can_be_edited() {
        return Err(AppError::business_rule("Cannot delete approved time entries"));
    }
    time_entry::delete(state.pool(), tenant_id, entry_id).await?;
    Ok(())
}

/// Reset an entry to PENDING and clear approver fields, for re-submission
/// after edits.
pub async fn submit_for_approval(
    state: &ServerState,
    tenant_id: i64,
    entry_id: i64,
) -> AppResult<TimeEntry> {
    let mut entry = fetch(state, tenant_id, entry_id).await?;
    entry.approval_status = ApprovalStatus::Pending;
    entry.approved_by = None;
    entry.approved_at = None;

    let mut tx = state.pool().begin().await?;
    time_entry::update(&mut tx, &entry).await?;
    tx.commit().await?;
    Ok(entry)
}

/// Create a batch of entries in one transaction; any validation or
/// storage failure leaves none of them committed.
pub async fn bulk_create(
    state: &ServerState,
    tenant_id: i64,
    inputs: Vec<TimeEntryInput>,
) -> AppResult<Vec<TimeEntry>> {
    // Validate and price everything before the transaction opens, so the
    // write phase can only fail on storage errors.
    let mut prepared = Vec::with_capacity(inputs.len());
    for input in inputs {
        let ctx = super::validation::validate_time_entry(state, tenant_id, &input, None).await?;
        let entry_date = input.entry_date.unwrap_or_default();
        let sheet = super::timesheet::get_or_create_for_date(
            state,
            tenant_id,
            input.employee_id,
            entry_date,
        )
        .await?;
        let status = if state.config.engine.approval_enabled {
            ApprovalStatus::Pending
        } else {
            ApprovalStatus::Approved
        };
        let (rate, amount) = resolve_billing(state, &input, &ctx)?;

        let now = shared::util::now_millis();
        prepared.push(TimeEntry {
            id: shared::util::snowflake_id(),
            tenant_id,
            employee_id: input.employee_id,
            entry_date,
            start_time: input.start_time,
            end_time: input.end_time,
            duration_minutes: ctx.duration_minutes,
            description: input.description,
            billable: ctx.billable,
            billing_rate: rate,
            billing_amount: amount,
            project_id: input.project_id,
            company_id: input.company_id,
            task_id: input.task_id,
            category_id: input.category_id,
            approval_status: status,
            approved_by: None,
            approved_at: None,
            timesheet_id: Some(sheet.id),
            timezone: input.timezone,
            created_at: now,
            updated_at: now,
        });
    }

    let mut tx = state.pool().begin().await?;
    for entry in &prepared {
        time_entry::insert(&mut tx, entry).await?;
    }
    tx.commit().await?;
    Ok(prepared)
}

/// Logged hours for one employee/day: Σ minutes ÷ 60, rounded to 2
/// decimals.
pub async fn total_hours(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    date: chrono::NaiveDate,
) -> AppResult<f64> {
    let minutes =
        time_entry::sum_minutes_for_date(state.pool(), tenant_id, employee_id, date).await?;
    let hours = Decimal::from(minutes) / Decimal::from(60);
    Ok(hours
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0))
}

pub async fn fetch(state: &ServerState, tenant_id: i64, entry_id: i64) -> AppResult<TimeEntry> {
    time_entry::find_by_id(state.pool(), tenant_id, entry_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Time entry {entry_id} not found")))
}

pub async fn list_for_date(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    date: chrono::NaiveDate,
) -> AppResult<Vec<TimeEntry>> {
    Ok(time_entry::find_for_employee_date(state.pool(), tenant_id, employee_id, date).await?)
}

/// Rate and amount for a billable entry; a non-billable one clears both.
fn resolve_billing(
    state: &ServerState,
    input: &TimeEntryInput,
    ctx: &EntryContext,
) -> AppResult<(Option<f64>, Option<f64>)> {
    if !ctx.billable {
        return Ok((None, None));
    }
    let rate = super::billing::resolve_rate(
        &super::billing::RateSources {
            override_rate: input.billing_rate,
            category: ctx.category.as_ref(),
            project: ctx.project.as_ref(),
            employee: Some(&ctx.employee),
        },
        &state.config.engine,
    )?;
    let amount = super::billing::billing_amount(ctx.duration_minutes, rate);
    Ok((Some(rate), Some(amount)))
}

fn merge(entry: &TimeEntry, patch: TimeEntryUpdate) -> TimeEntryInput {
    TimeEntryInput {
        employee_id: entry.employee_id,
        entry_date: patch.entry_date.or(Some(entry.entry_date)),
        start_time: patch.start_time.or(entry.start_time),
        end_time: patch.end_time.or(entry.end_time),
        duration_minutes: patch.duration_minutes.or(Some(entry.duration_minutes)),
        description: patch.description.or_else(|| entry.description.clone()),
        billable: patch.billable.or(Some(entry.billable)),
        // The stored rate rides along as the override so an unrelated
        // edit does not silently re-price the entry.
        billing_rate: patch.billing_rate.or(entry.billing_rate),
        project_id: patch.project_id.or(entry.project_id),
        company_id: patch.company_id.or(entry.company_id),
        task_id: patch.task_id.or(entry.task_id),
        category_id: patch.category_id.or(entry.category_id),
        timezone: patch.timezone.or_else(|| entry.timezone.clone()),
    }
}
