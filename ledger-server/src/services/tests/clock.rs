//! Clock in/out session lifecycle.

use shared::models::{ApprovalStatus, TimeEntry};

use super::*;
use crate::services::time_clock::{self, ClockInRequest};
use crate::utils::AppError;

/// Insert an already-running session that started `minutes_ago` minutes
/// in the past, so clock-out produces a deterministic duration.
async fn seed_open_session(state: &ServerState, employee_id: i64, minutes_ago: i64) -> TimeEntry {
    let now = shared::util::now_millis();
    let start = now - minutes_ago * 60_000;
    let entry = TimeEntry {
        id: shared::util::snowflake_id(),
        tenant_id: TENANT,
        employee_id,
        entry_date: crate::utils::time::millis_to_date(start, chrono_tz::UTC),
        start_time: Some(start),
        end_time: None,
        duration_minutes: 0,
        description: Some("working".into()),
        billable: false,
        billing_rate: None,
        billing_amount: None,
        project_id: None,
        company_id: None,
        task_id: None,
        category_id: None,
        approval_status: ApprovalStatus::Pending,
        approved_by: None,
        approved_at: None,
        timesheet_id: None,
        timezone: None,
        created_at: now,
        updated_at: now,
    };
    let mut tx = state.pool().begin().await.unwrap();
    repository::time_entry::insert(&mut tx, &entry).await.unwrap();
    tx.commit().await.unwrap();
    entry
}

#[tokio::test]
async fn clock_in_opens_a_session_bound_to_a_timesheet() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ana", None).await;

    let entry = time_clock::clock_in(&state, TENANT, employee.id, ClockInRequest::default())
        .await
        .unwrap();
    assert!(entry.start_time.is_some());
    assert!(entry.end_time.is_none());
    assert_eq!(entry.approval_status, ApprovalStatus::Pending);
    assert!(entry.timesheet_id.is_some());

    let active = time_clock::active_session(&state, TENANT, employee.id)
        .await
        .unwrap()
        .expect("session should be active");
    assert_eq!(active.id, entry.id);
}

#[tokio::test]
async fn double_clock_in_is_rejected() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ben", None).await;

    time_clock::clock_in(&state, TENANT, employee.id, ClockInRequest::default())
        .await
        .unwrap();
    let err = time_clock::clock_in(&state, TENANT, employee.id, ClockInRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // Still exactly one open session
    let active = time_clock::active_session(&state, TENANT, employee.id)
        .await
        .unwrap();
    assert!(active.is_some());
}

#[tokio::test]
async fn clock_out_without_session_fails() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Cleo", None).await;

    let err = time_clock::clock_out(&state, TENANT, employee.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn clock_out_derives_duration_and_appends_notes() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Dia", None).await;
    seed_open_session(&state, employee.id, 90).await;

    let entry = time_clock::clock_out(&state, TENANT, employee.id, Some("wrapped up".into()))
        .await
        .unwrap();
    assert_eq!(entry.duration_minutes, 90);
    assert!(entry.end_time.is_some());
    assert_eq!(entry.description.as_deref(), Some("working\nwrapped up"));
    // Non-billable session carries no billing fields
    assert_eq!(entry.billing_rate, None);
    assert_eq!(entry.billing_amount, None);

    let active = time_clock::active_session(&state, TENANT, employee.id)
        .await
        .unwrap();
    assert!(active.is_none());
}

#[tokio::test]
async fn billable_session_is_priced_at_clock_in_rate() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Eli", None).await;
    let category = seed_category(&state, "Consulting", true, Some(80.0)).await;

    let opened = time_clock::clock_in(
        &state,
        TENANT,
        employee.id,
        ClockInRequest {
            category_id: Some(category.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(opened.billable);
    assert_eq!(opened.billing_rate, Some(80.0));
    assert_eq!(opened.billing_amount, None);

    let closed = time_clock::clock_out(&state, TENANT, employee.id, None)
        .await
        .unwrap();
    assert_eq!(closed.billing_rate, Some(80.0));
    // Sub-minute session rounds to a zero amount
    assert_eq!(closed.billing_amount, Some(0.0));
}

#[tokio::test]
async fn clock_out_reprices_from_the_sessions_own_category() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Gus", None).await;
    let category = seed_category(&state, "Consulting", true, Some(80.0)).await;

    // A billable session that never captured a rate at clock-in; it
    // still carries its category, which must drive the repricing.
    let now = shared::util::now_millis();
    let start = now - 90 * 60_000;
    let entry = TimeEntry {
        id: shared::util::snowflake_id(),
        tenant_id: TENANT,
        employee_id: employee.id,
        entry_date: crate::utils::time::millis_to_date(start, chrono_tz::UTC),
        start_time: Some(start),
        end_time: None,
        duration_minutes: 0,
        description: None,
        billable: true,
        billing_rate: None,
        billing_amount: None,
        project_id: None,
        company_id: None,
        task_id: None,
        category_id: Some(category.id),
        approval_status: ApprovalStatus::Pending,
        approved_by: None,
        approved_at: None,
        timesheet_id: None,
        timezone: None,
        created_at: now,
        updated_at: now,
    };
    let mut tx = state.pool().begin().await.unwrap();
    repository::time_entry::insert(&mut tx, &entry).await.unwrap();
    tx.commit().await.unwrap();

    let closed = time_clock::clock_out(&state, TENANT, employee.id, None)
        .await
        .unwrap();
    assert_eq!(closed.duration_minutes, 90);
    assert_eq!(closed.billing_rate, Some(80.0));
    assert_eq!(closed.billing_amount, Some(120.0));
}

#[tokio::test]
async fn unpriceable_billable_clock_in_is_rejected() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Fay", None).await;

    let err = time_clock::clock_in(
        &state,
        TENANT,
        employee.id,
        ClockInRequest {
            billable: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}
