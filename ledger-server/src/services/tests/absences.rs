//! Absence workflow scenarios against the balance ledger.

use shared::models::{AbsenceCreate, AbsenceStatus, AbsenceUpdate};

use super::*;
use crate::services::{absence, leave_balance};
use crate::utils::AppError;

async fn balance(state: &ServerState, employee_id: i64, leave_type_id: i64) -> (f64, f64, f64) {
    balance_for_year(state, employee_id, leave_type_id, 2024).await
}

async fn balance_for_year(
    state: &ServerState,
    employee_id: i64,
    leave_type_id: i64,
    year: i32,
) -> (f64, f64, f64) {
    let b = leave_balance::get_balance(state, TENANT, employee_id, leave_type_id, year)
        .await
        .unwrap();
    (b.pending_days, b.used_days, b.available_days)
}

fn request(employee_id: i64, leave_type_id: i64, start: &str, end: &str) -> AbsenceCreate {
    AbsenceCreate {
        employee_id,
        leave_type_id,
        start_date: d(start),
        end_date: d(end),
        notes: None,
    }
}

#[tokio::test]
async fn approval_required_round_trip() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ana", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    // Request 5 days: reservation held, nothing used yet
    let req = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-07"),
    )
    .await
    .unwrap();
    assert_eq!(req.status, AbsenceStatus::Pending);
    assert_eq!(req.duration_days, 5.0);
    assert_eq!(balance(&state, employee.id, lt.id).await, (5.0, 0.0, 15.0));

    // Approve: reservation commits to used days, availability unchanged
    let approved = absence::approve(&state, TENANT, req.id, Some(99)).await.unwrap();
    assert_eq!(approved.status, AbsenceStatus::Approved);
    assert_eq!(approved.approver_id, Some(99));
    assert!(approved.approved_at.is_some());
    assert_eq!(balance(&state, employee.id, lt.id).await, (0.0, 5.0, 15.0));

    // Cancel the approved absence: the days come back
    let cancelled = absence::cancel(&state, TENANT, req.id, Some(99), "plans changed")
        .await
        .unwrap();
    assert_eq!(cancelled.status, AbsenceStatus::Cancelled);
    assert!(cancelled.notes.as_deref().unwrap().contains("plans changed"));
    assert_eq!(balance(&state, employee.id, lt.id).await, (0.0, 0.0, 20.0));
}

#[tokio::test]
async fn auto_approval_deducts_directly() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ben", None).await;
    let lt = seed_leave_type(&state, "Sick", false, 10.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    let req = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-04"),
    )
    .await
    .unwrap();
    assert_eq!(req.status, AbsenceStatus::Approved);
    assert_eq!(balance(&state, employee.id, lt.id).await, (0.0, 2.0, 8.0));
}

#[tokio::test]
async fn overlapping_request_is_rejected() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Cleo", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-07"),
    )
    .await
    .unwrap();

    // Touching the existing range on its last day conflicts (inclusive)
    let err = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-07", "2024-06-10"),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(fields) => {
            assert!(fields.get("start_date").unwrap().contains("2024-06-03"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // The day after the range is fine
    absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-08", "2024-06-10"),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn end_before_start_is_rejected() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Dia", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;

    let err = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-07", "2024-06-03"),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(fields) => {
            assert!(fields.get("end_date").is_some());
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn editing_pending_request_adjusts_the_hold_by_delta() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Eli", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    let req = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-07"),
    )
    .await
    .unwrap();
    assert_eq!(balance(&state, employee.id, lt.id).await, (5.0, 0.0, 15.0));

    // Shrink to 3 days: hold drops by 2
    let updated = absence::update(
        &state,
        TENANT,
        req.id,
        AbsenceUpdate {
            end_date: Some(d("2024-06-05")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.duration_days, 3.0);
    assert_eq!(balance(&state, employee.id, lt.id).await, (3.0, 0.0, 17.0));
}

#[tokio::test]
async fn editing_into_the_next_year_moves_the_hold() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ira", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2025)
        .await
        .unwrap();

    let req = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-12-23", "2024-12-27"),
    )
    .await
    .unwrap();
    assert_eq!(balance_for_year(&state, employee.id, lt.id, 2024).await, (5.0, 0.0, 15.0));

    // Same duration, but the request now starts in the next ledger year:
    // the hold must follow it
    let updated = absence::update(
        &state,
        TENANT,
        req.id,
        AbsenceUpdate {
            start_date: Some(d("2025-01-06")),
            end_date: Some(d("2025-01-10")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.duration_days, 5.0);
    assert_eq!(balance_for_year(&state, employee.id, lt.id, 2024).await, (0.0, 0.0, 20.0));
    assert_eq!(balance_for_year(&state, employee.id, lt.id, 2025).await, (5.0, 0.0, 15.0));

    // Approval settles entirely in the new year
    absence::approve(&state, TENANT, req.id, Some(7)).await.unwrap();
    assert_eq!(balance_for_year(&state, employee.id, lt.id, 2024).await, (0.0, 0.0, 20.0));
    assert_eq!(balance_for_year(&state, employee.id, lt.id, 2025).await, (0.0, 5.0, 15.0));
}

#[tokio::test]
async fn concurrent_rejections_release_the_hold_once() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Jo", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    let req = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-07"),
    )
    .await
    .unwrap();
    assert_eq!(balance(&state, employee.id, lt.id).await, (5.0, 0.0, 15.0));

    // Two reviewers reject at the same time: exactly one wins, and the
    // reservation is released exactly once
    let (first, second) = tokio::join!(
        absence::reject(&state, TENANT, req.id, Some(1), "coverage gap"),
        absence::reject(&state, TENANT, req.id, Some(2), "coverage gap"),
    );
    assert!(first.is_ok() ^ second.is_ok());
    assert_eq!(balance(&state, employee.id, lt.id).await, (0.0, 0.0, 20.0));

    let row = absence::fetch(&state, TENANT, req.id).await.unwrap();
    assert_eq!(row.status, AbsenceStatus::Rejected);
}

#[tokio::test]
async fn reject_releases_the_reservation() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Fay", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    let req = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-07"),
    )
    .await
    .unwrap();

    let rejected = absence::reject(&state, TENANT, req.id, Some(42), "coverage gap")
        .await
        .unwrap();
    assert_eq!(rejected.status, AbsenceStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("coverage gap"));
    assert_eq!(balance(&state, employee.id, lt.id).await, (0.0, 0.0, 20.0));

    // A rejected request is final: cancel is a no-op
    let unchanged = absence::cancel(&state, TENANT, req.id, None, "whatever")
        .await
        .unwrap();
    assert_eq!(unchanged.status, AbsenceStatus::Rejected);

    // And it cannot be approved
    let err = absence::approve(&state, TENANT, req.id, None).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn insufficient_balance_fails_validation() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Gus", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 3.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    let err = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-07"),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(fields) => {
            assert!(fields.get("leave_type_id").unwrap().contains("Insufficient"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn check_overlap_reports_all_statuses() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Hal", None).await;
    let lt = seed_leave_type(&state, "Vacation", true, 20.0).await;
    leave_balance::initialize_balances(&state, TENANT, employee.id, 2024)
        .await
        .unwrap();

    let req = absence::create(
        &state,
        TENANT,
        request(employee.id, lt.id, "2024-06-03", "2024-06-07"),
    )
    .await
    .unwrap();
    absence::cancel(&state, TENANT, req.id, None, "changed").await.unwrap();

    // The validator ignores cancelled rows, the report does not
    let report = absence::check_overlap(&state, TENANT, employee.id, d("2024-06-01"), d("2024-06-30"))
        .await
        .unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].status, AbsenceStatus::Cancelled);
}
