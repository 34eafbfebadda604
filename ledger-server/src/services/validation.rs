//! Validation Service
//!
//! Single gatekeeper for time-entry and absence input. Rules collect into
//! a [`FieldErrors`] map so every failing field carries its own message;
//! missing referenced rows short-circuit as NotFound before any rule runs.
//!
//! Interval predicates differ on purpose: time windows use the half-open
//! test `a.start < b.end && a.end > b.start`, date ranges the inclusive
//! test `a.start <= b.end && a.end >= b.start`.

use chrono::TimeZone;
use chrono_tz::Tz;
use shared::models::{Employee, LeaveType, Project, TimeCategory, TimeEntryInput};

use crate::core::ServerState;
use crate::db::repository;
use crate::utils::validation::{MAX_NOTE_LEN, check_optional_text};
use crate::utils::{AppError, AppResult, FieldErrors, time};

/// Derived values and loaded rows from a successful time-entry validation,
/// handed to the caller so billing does not re-fetch anything.
#[derive(Debug)]
pub struct EntryContext {
    pub employee: Employee,
    pub duration_minutes: i64,
    pub billable: bool,
    pub category: Option<TimeCategory>,
    pub project: Option<Project>,
}

/// Validate a time-entry payload. `exclude_id` is the entry being edited,
/// exempt from self-conflict and from the inactive-category rule when it
/// already used that category.
pub async fn validate_time_entry(
    state: &ServerState,
    tenant_id: i64,
    input: &TimeEntryInput,
    exclude_id: Option<i64>,
) -> AppResult<EntryContext> {
    let pool = state.pool();

    let employee = repository::employee::find_by_id(pool, tenant_id, input.employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", input.employee_id)))?;

    let category = match input.category_id {
        Some(id) => Some(
            repository::time_category::find_by_id(pool, tenant_id, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Time category {id} not found")))?,
        ),
        None => None,
    };
    let project = match input.project_id {
        Some(id) => Some(
            repository::project::find_by_id(pool, tenant_id, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))?,
        ),
        None => None,
    };
    let task = match input.task_id {
        Some(id) => Some(
            repository::project::find_task(pool, tenant_id, id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Task {id} not found")))?,
        ),
        None => None,
    };
    let existing = match exclude_id {
        Some(id) => repository::time_entry::find_by_id(pool, tenant_id, id).await?,
        None => None,
    };

    let mut errors = FieldErrors::new();

    let entry_date = match input.entry_date {
        Some(d) => d,
        None => {
            errors.add("entry_date", "Entry date is required.");
            return errors.into_result().map(|_| unreachable!());
        }
    };

    check_optional_text(&mut errors, "description", &input.description, MAX_NOTE_LEN);

    // Start/end pairing and duration derivation
    let duration_minutes = match (input.start_time, input.end_time) {
        (Some(start), Some(end)) => {
            if end <= start {
                errors.add("end_time", "End time must be after start time.");
            }
            time::minutes_between(start, end).max(0)
        }
        (Some(_), None) => {
            errors.add(
                "end_time",
                "Start time and end time must be provided together.",
            );
            input.duration_minutes.unwrap_or(0)
        }
        (None, Some(_)) => {
            errors.add(
                "start_time",
                "Start time and end time must be provided together.",
            );
            input.duration_minutes.unwrap_or(0)
        }
        (None, None) => match input.duration_minutes {
            Some(d) if d > 0 => d,
            _ => {
                errors.add(
                    "duration_minutes",
                    "Duration is required when start and end times are not provided.",
                );
                0
            }
        },
    };

    // Association rules
    if input.project_id.is_none()
        && input.company_id.is_none()
        && input.task_id.is_none()
        && input.category_id.is_none()
    {
        errors.add(
            "project_id",
            "At least one of project, company, task or category must be set.",
        );
    }

    let billable = input
        .billable
        .or(category.as_ref().map(|c| c.is_billable_default))
        .unwrap_or(false);
    if billable && input.project_id.is_none() && input.company_id.is_none() {
        errors.add("billable", "Billable entries require a project or company.");
    }

    // An inactive category stays legal only for the entry that already
    // carries it.
    if let Some(cat) = &category
        && !cat.is_active
    {
        let grandfathered = existing
            .as_ref()
            .is_some_and(|e| e.category_id == Some(cat.id));
        if !grandfathered {
            errors.add("category_id", "Time category is inactive.");
        }
    }

    // Half-open overlap against the employee's other entries for the day
    if let (Some(start), Some(end)) = (input.start_time, input.end_time)
        && end > start
    {
        let tz = entry_timezone(input.timezone.as_deref(), state);
        let others =
            repository::time_entry::find_for_employee_date(pool, tenant_id, input.employee_id, entry_date)
                .await?;
        for other in &others {
            if Some(other.id) == exclude_id {
                continue;
            }
            if let (Some(os), Some(oe)) = (other.start_time, other.end_time)
                && overlaps_half_open((start, end), (os, oe))
            {
                errors.add(
                    "start_time",
                    format!(
                        "Overlaps an existing time entry from {} to {}.",
                        format_hhmm(os, tz),
                        format_hhmm(oe, tz)
                    ),
                );
                break;
            }
        }
    }

    // Project access and task ownership
    if let Some(proj) = &project {
        let has_access = employee.user_id.is_none()
            || repository::project::is_member(pool, proj.id, employee.id).await?;
        if !has_access {
            errors.add("project_id", "Employee does not have access to this project.");
        }
        if let Some(t) = &task
            && t.project_id != proj.id
        {
            errors.add("task_id", "Task does not belong to the selected project.");
        }
    }

    errors.into_result()?;

    Ok(EntryContext {
        employee,
        duration_minutes,
        billable,
        category,
        project,
    })
}

/// Validate an absence request: range sanity, inclusive-range overlap
/// against non-cancelled absences, and balance sufficiency. Returns the
/// leave type and the derived duration in days.
pub async fn validate_absence(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    leave_type_id: i64,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    notes: &Option<String>,
    exclude_id: Option<i64>,
) -> AppResult<(LeaveType, f64)> {
    let pool = state.pool();

    repository::employee::find_by_id(pool, tenant_id, employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;
    let leave_type = repository::leave_type::find_by_id(pool, tenant_id, leave_type_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave type {leave_type_id} not found")))?;

    let mut errors = FieldErrors::new();
    check_optional_text(&mut errors, "notes", notes, MAX_NOTE_LEN);

    if end_date < start_date {
        errors.add("end_date", "End date must be on or after start date.");
        return errors.into_result().map(|_| unreachable!());
    }

    let overlapping = repository::absence::find_overlapping(
        pool, tenant_id, employee_id, start_date, end_date, exclude_id,
    )
    .await?;
    if let Some(conflict) = overlapping.first() {
        errors.add(
            "start_date",
            format!(
                "Overlaps an existing absence from {} to {}.",
                conflict.start_date, conflict.end_date
            ),
        );
    }

    let duration = shared::models::absence_duration_days(start_date, end_date);
    let balance = super::leave_balance::get_balance(
        state,
        tenant_id,
        employee_id,
        leave_type_id,
        chrono::Datelike::year(&start_date),
    )
    .await?;
    if balance.available_days < duration {
        errors.add(
            "leave_type_id",
            format!(
                "Insufficient leave balance: {} days available, {} requested.",
                balance.available_days, duration
            ),
        );
    }

    errors.into_result()?;
    Ok((leave_type, duration))
}

fn entry_timezone(name: Option<&str>, state: &ServerState) -> Tz {
    name.and_then(|n| n.parse().ok())
        .unwrap_or(state.config.engine.timezone)
}

fn format_hhmm(millis: i64, tz: Tz) -> String {
    tz.timestamp_millis_opt(millis)
        .latest()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

pub(crate) fn overlaps_half_open(a: (i64, i64), b: (i64, i64)) -> bool {
    a.0 < b.1 && a.1 > b.0
}
