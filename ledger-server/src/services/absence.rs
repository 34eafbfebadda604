//! Absence Service — the leave-request workflow
//!
//! PENDING → {APPROVED, REJECTED, CANCELLED}; APPROVED → CANCELLED.
//! Every transition moves days through exactly one ledger primitive, and
//! the primitive, the status write-back, and its guard commit together:
//! the row update is conditional on the status the transition expects, so
//! a racing writer finds zero rows and rolls back instead of moving the
//! same days twice. Which primitive runs depends on the leave type:
//! approval-required types hold a reservation (reserve → commit/release),
//! auto-approved types deduct used days directly.

use chrono::NaiveDate;
use shared::models::{Absence, AbsenceCreate, AbsenceStatus, AbsenceUpdate, LeaveType};

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::repository::{self, absence};
use crate::utils::{AppError, AppResult};

/// Create a leave request. Approval-required types reserve the days and
/// stay PENDING; all other types are approved on the spot. Row and ledger
/// commit atomically, so a failed reservation leaves no orphan request.
pub async fn create(state: &ServerState, tenant_id: i64, data: AbsenceCreate) -> AppResult<Absence> {
    let (leave_type, duration) = super::validation::validate_absence(
        state,
        tenant_id,
        data.employee_id,
        data.leave_type_id,
        data.start_date,
        data.end_date,
        &data.notes,
        None,
    )
    .await?;

    let now = shared::util::now_millis();
    let mut record = Absence {
        id: shared::util::snowflake_id(),
        tenant_id,
        employee_id: data.employee_id,
        leave_type_id: data.leave_type_id,
        start_date: data.start_date,
        end_date: data.end_date,
        duration_days: duration,
        status: AbsenceStatus::Pending,
        approver_id: None,
        approved_at: None,
        rejection_reason: None,
        notes: data.notes,
        created_at: now,
        updated_at: now,
    };

    let auto_approved = !leave_type.requires_approval;
    if auto_approved {
        record.status = AbsenceStatus::Approved;
        record.approved_at = Some(now);
    }

    let mut tx = state.pool().begin().await?;
    absence::insert(&mut tx, &record).await?;
    if auto_approved {
        super::leave_balance::deduct_used_in_tx(&mut tx, &record).await?;
    } else {
        super::leave_balance::reserve_in_tx(&mut tx, &record).await?;
    }
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            None,
            AuditAction::AbsenceCreated,
            "absence",
            record.id,
            serde_json::json!({ "duration_days": duration, "status": record.status }),
        )
        .await;
    if auto_approved {
        state
            .audit
            .record(
                tenant_id,
                None,
                AuditAction::AbsenceApproved,
                "absence",
                record.id,
                serde_json::json!({ "status": record.status }),
            )
            .await;
    }

    Ok(record)
}

/// Edit a pending request. When the duration or the ledger year of a
/// reserved request changes, the pending hold is rebooked in the same
/// transaction that persists the new dates.
pub async fn update(
    state: &ServerState,
    tenant_id: i64,
    absence_id: i64,
    patch: AbsenceUpdate,
) -> AppResult<Absence> {
    let record = fetch(state, tenant_id, absence_id).await?;
    if !record.status.can_be_edited() {
        return Err(AppError::business_rule("Only pending absences can be edited"));
    }

    let start_date = patch.start_date.unwrap_or(record.start_date);
    let end_date = patch.end_date.unwrap_or(record.end_date);
    let notes = patch.notes.or_else(|| record.notes.clone());

    let (leave_type, new_duration) = super::validation::validate_absence(
        state,
        tenant_id,
        record.employee_id,
        record.leave_type_id,
        start_date,
        end_date,
        &notes,
        Some(record.id),
    )
    .await?;

    let mut updated = record.clone();
    updated.start_date = start_date;
    updated.end_date = end_date;
    updated.duration_days = new_duration;
    updated.notes = notes;

    let delta = new_duration - record.duration_days;
    let year_changed = updated.balance_year() != record.balance_year();

    let mut tx = state.pool().begin().await?;
    if !absence::update_if_status(&mut tx, &updated, AbsenceStatus::Pending).await? {
        return Err(AppError::business_rule("Only pending absences can be edited"));
    }
    if leave_type.requires_approval && (year_changed || delta != 0.0) {
        super::leave_balance::rebook_pending_in_tx(
            &mut tx,
            &record,
            updated.balance_year(),
            new_duration,
        )
        .await?;
    }
    tx.commit().await?;
    Ok(updated)
}

/// Approve a pending request: commit its reservation, or deduct used
/// days directly for auto-approved types.
pub async fn approve(
    state: &ServerState,
    tenant_id: i64,
    absence_id: i64,
    approver_id: Option<i64>,
) -> AppResult<Absence> {
    let record = fetch(state, tenant_id, absence_id).await?;
    if !record.status.can_be_approved() {
        return Err(AppError::business_rule("Only pending absences can be approved"));
    }
    let leave_type = fetch_leave_type(state, tenant_id, record.leave_type_id).await?;

    let mut approved = record;
    approved.status = AbsenceStatus::Approved;
    approved.approver_id = approver_id;
    approved.approved_at = Some(shared::util::now_millis());

    let mut tx = state.pool().begin().await?;
    if !absence::update_if_status(&mut tx, &approved, AbsenceStatus::Pending).await? {
        return Err(AppError::business_rule("Only pending absences can be approved"));
    }
    if leave_type.requires_approval {
        super::leave_balance::commit_reservation_in_tx(&mut tx, &approved).await?;
    } else {
        super::leave_balance::deduct_used_in_tx(&mut tx, &approved).await?;
    }
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            approver_id,
            AuditAction::AbsenceApproved,
            "absence",
            approved.id,
            serde_json::json!({ "status": approved.status }),
        )
        .await;

    Ok(approved)
}

/// Reject a pending request, releasing its reservation when one exists.
pub async fn reject(
    state: &ServerState,
    tenant_id: i64,
    absence_id: i64,
    approver_id: Option<i64>,
    reason: &str,
) -> AppResult<Absence> {
    if reason.trim().is_empty() {
        return Err(AppError::validation(
            "rejection_reason",
            "Rejection reason must not be empty.",
        ));
    }

    let record = fetch(state, tenant_id, absence_id).await?;
    if !record.status.can_be_rejected() {
        return Err(AppError::business_rule("Only pending absences can be rejected"));
    }
    let leave_type = fetch_leave_type(state, tenant_id, record.leave_type_id).await?;

    let mut rejected = record;
    rejected.status = AbsenceStatus::Rejected;
    rejected.approver_id = approver_id;
    rejected.rejection_reason = Some(reason.trim().to_string());

    let mut tx = state.pool().begin().await?;
    if !absence::update_if_status(&mut tx, &rejected, AbsenceStatus::Pending).await? {
        return Err(AppError::business_rule("Only pending absences can be rejected"));
    }
    if leave_type.requires_approval {
        super::leave_balance::release_pending_in_tx(&mut tx, &rejected).await?;
    }
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            approver_id,
            AuditAction::AbsenceRejected,
            "absence",
            rejected.id,
            serde_json::json!({ "status": rejected.status, "reason": rejected.rejection_reason }),
        )
        .await;

    Ok(rejected)
}

/// Cancel a pending or approved request, giving the held or used days
/// back to the balance. Requests that cannot be cancelled are returned
/// untouched.
pub async fn cancel(
    state: &ServerState,
    tenant_id: i64,
    absence_id: i64,
    actor_id: Option<i64>,
    reason: &str,
) -> AppResult<Absence> {
    let record = fetch(state, tenant_id, absence_id).await?;
    if !record.status.can_be_cancelled() {
        return Ok(record);
    }
    let leave_type = fetch_leave_type(state, tenant_id, record.leave_type_id).await?;

    let prior = record.status;
    let mut cancelled = record;
    cancelled.status = AbsenceStatus::Cancelled;
    let note = format!("Cancelled: {}", reason.trim());
    cancelled.notes = match cancelled.notes.take() {
        Some(existing) => Some(format!("{existing}\n{note}")),
        None => Some(note),
    };

    let mut tx = state.pool().begin().await?;
    if !absence::update_if_status(&mut tx, &cancelled, prior).await? {
        // Lost a race against another transition; report the row as it
        // is now, days untouched.
        tx.rollback().await?;
        return fetch(state, tenant_id, absence_id).await;
    }
    match prior {
        AbsenceStatus::Pending if leave_type.requires_approval => {
            super::leave_balance::release_pending_in_tx(&mut tx, &cancelled).await?;
        }
        AbsenceStatus::Approved => {
            super::leave_balance::restore_used_in_tx(&mut tx, &cancelled).await?;
        }
        _ => {}
    }
    tx.commit().await?;

    state
        .audit
        .record(
            tenant_id,
            actor_id,
            AuditAction::AbsenceCancelled,
            "absence",
            cancelled.id,
            serde_json::json!({ "status": cancelled.status }),
        )
        .await;

    Ok(cancelled)
}

/// Every absence intersecting the inclusive date range, regardless of
/// status. Reporting view, looser than the write-time validator.
pub async fn check_overlap(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> AppResult<Vec<Absence>> {
    Ok(absence::find_in_range(state.pool(), tenant_id, employee_id, start_date, end_date).await?)
}

pub async fn list_for_employee(
    state: &ServerState,
    tenant_id: i64,
    employee_id: i64,
    limit: i32,
    offset: i32,
) -> AppResult<Vec<Absence>> {
    Ok(absence::list_for_employee(state.pool(), tenant_id, employee_id, limit, offset).await?)
}

pub async fn fetch(state: &ServerState, tenant_id: i64, absence_id: i64) -> AppResult<Absence> {
    absence::find_by_id(state.pool(), tenant_id, absence_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Absence {absence_id} not found")))
}

async fn fetch_leave_type(
    state: &ServerState,
    tenant_id: i64,
    leave_type_id: i64,
) -> AppResult<LeaveType> {
    repository::leave_type::find_by_id(state.pool(), tenant_id, leave_type_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Leave type {leave_type_id} not found")))
}
