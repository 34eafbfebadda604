//! Weekly timesheet lifecycle: periods, deadlines, and the approval
//! cascade.

use chrono::Weekday;
use shared::models::{ApprovalStatus, TimesheetStatus};

use super::*;
use crate::services::{time_entry, timesheet};
use crate::utils::AppError;

#[test]
fn period_honors_the_configured_first_day() {
    // Monday weeks
    assert_eq!(
        timesheet::period_for(d("2024-06-05"), Weekday::Mon),
        (d("2024-06-03"), d("2024-06-09"))
    );
    // Sunday weeks: a Wednesday falls into the week starting the previous
    // Sunday
    assert_eq!(
        timesheet::period_for(d("2024-01-03"), Weekday::Sun),
        (d("2023-12-31"), d("2024-01-06"))
    );
    // The first day itself starts its own week
    assert_eq!(
        timesheet::period_for(d("2024-06-03"), Weekday::Mon),
        (d("2024-06-03"), d("2024-06-09"))
    );
}

#[tokio::test]
async fn deadline_is_offset_past_period_end_at_the_configured_time() {
    let state = test_state().await;
    // Defaults: +3 days at 17:00 UTC
    let deadline = timesheet::deadline_for(&state, d("2024-06-09"));
    let expected = crate::utils::time::date_hms_to_millis(d("2024-06-12"), 17, 0, 0, chrono_tz::UTC);
    assert_eq!(deadline, expected);
}

#[tokio::test]
async fn one_sheet_per_employee_week() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ana", None).await;

    let sheet = timesheet::get_or_create_for_date(&state, TENANT, employee.id, d("2024-06-03"))
        .await
        .unwrap();
    assert_eq!(sheet.status, TimesheetStatus::Draft);
    assert_eq!(sheet.period_start, d("2024-06-03"));
    assert_eq!(sheet.period_end, d("2024-06-09"));
    assert!(sheet.deadline.is_some());

    // Any other day of the same week resolves to the same sheet
    let same = timesheet::get_or_create_for_date(&state, TENANT, employee.id, d("2024-06-07"))
        .await
        .unwrap();
    assert_eq!(same.id, sheet.id);

    // The next week gets its own
    let next = timesheet::get_or_create_for_date(&state, TENANT, employee.id, d("2024-06-10"))
        .await
        .unwrap();
    assert_ne!(next.id, sheet.id);
}

#[tokio::test]
async fn approve_cascades_to_entries_and_unlock_reverses_it() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ben", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let first = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 60, category.id),
    )
    .await
    .unwrap();
    time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-04", 30, category.id),
    )
    .await
    .unwrap();
    let sheet_id = first.timesheet_id.unwrap();

    let submitted = timesheet::submit(&state, TENANT, sheet_id, 1).await.unwrap();
    assert_eq!(submitted.status, TimesheetStatus::Pending);
    assert!(submitted.submitted_at.is_some());

    let approved = timesheet::approve(&state, TENANT, sheet_id, 42).await.unwrap();
    assert_eq!(approved.status, TimesheetStatus::Approved);
    assert_eq!(approved.locked_by, Some(42));
    assert!(approved.locked_at.is_some());

    let entries = repository::time_entry::find_by_timesheet(state.pool(), TENANT, sheet_id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert_eq!(entry.approval_status, ApprovalStatus::Approved);
        assert_eq!(entry.approved_by, Some(42));
        assert!(entry.approved_at.is_some());
    }

    // Locked entries refuse edits
    let err = time_entry::delete(&state, TENANT, first.id).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // Approved sheets cannot be re-submitted, only unlocked
    let err = timesheet::submit(&state, TENANT, sheet_id, 1).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    let unlocked = timesheet::unlock(&state, TENANT, sheet_id, 42).await.unwrap();
    assert_eq!(unlocked.status, TimesheetStatus::Pending);
    assert!(unlocked.locked_at.is_none());

    let entries = repository::time_entry::find_by_timesheet(state.pool(), TENANT, sheet_id)
        .await
        .unwrap();
    for entry in &entries {
        assert_eq!(entry.approval_status, ApprovalStatus::Pending);
        assert_eq!(entry.approved_by, None);
    }
}

#[tokio::test]
async fn reject_requires_a_substantive_reason_and_allows_resubmission() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Cleo", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let entry = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 60, category.id),
    )
    .await
    .unwrap();
    let sheet_id = entry.timesheet_id.unwrap();
    timesheet::submit(&state, TENANT, sheet_id, 1).await.unwrap();

    let err = timesheet::reject(&state, TENANT, sheet_id, 42, "too short")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let rejected = timesheet::reject(&state, TENANT, sheet_id, 42, "Missing entries for Tuesday")
        .await
        .unwrap();
    assert_eq!(rejected.status, TimesheetStatus::Rejected);
    assert_eq!(
        rejected.rejection_reason.as_deref(),
        Some("Missing entries for Tuesday")
    );

    let entries = repository::time_entry::find_by_timesheet(state.pool(), TENANT, sheet_id)
        .await
        .unwrap();
    assert_eq!(entries[0].approval_status, ApprovalStatus::Rejected);

    // A rejected sheet goes around again
    let resubmitted = timesheet::submit(&state, TENANT, sheet_id, 1).await.unwrap();
    assert_eq!(resubmitted.status, TimesheetStatus::Pending);
    assert!(resubmitted.rejection_reason.is_none());
}

#[tokio::test]
async fn only_the_owning_user_may_submit() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Dia", Some(7)).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let entry = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 60, category.id),
    )
    .await
    .unwrap();
    let sheet_id = entry.timesheet_id.unwrap();

    let err = timesheet::submit(&state, TENANT, sheet_id, 8).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    timesheet::submit(&state, TENANT, sheet_id, 7).await.unwrap();
}

#[tokio::test]
async fn minimum_daily_minutes_blocks_submission() {
    let state = test_state_with(EngineSettings {
        min_daily_minutes: 60,
        ..Default::default()
    })
    .await;
    let employee = seed_employee(&state, "Eli", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    // Monday is covered, the rest of the week is not
    let entry = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 90, category.id),
    )
    .await
    .unwrap();
    let sheet_id = entry.timesheet_id.unwrap();

    let err = timesheet::submit(&state, TENANT, sheet_id, 1).await.unwrap_err();
    match err {
        AppError::BusinessRule(message) => {
            assert!(message.contains("2024-06-04"));
            assert!(message.contains("below the required 60"));
        }
        other => panic!("expected business rule error, got {other:?}"),
    }
}

#[tokio::test]
async fn totals_aggregate_per_day_and_by_billability() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Fay", None).await;
    let category = seed_category(&state, "Admin", false, None).await;
    let billable_cat = seed_category(&state, "Consulting", true, Some(100.0)).await;
    let project = seed_project(&state, "Redesign", None).await;

    let entry = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 60, category.id),
    )
    .await
    .unwrap();
    time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 30, category.id),
    )
    .await
    .unwrap();
    time_entry::create(
        &state,
        TENANT,
        shared::models::TimeEntryInput {
            project_id: Some(project.id),
            ..entry_input(employee.id, "2024-06-04", 45, billable_cat.id)
        },
    )
    .await
    .unwrap();

    let totals = timesheet::totals(&state, TENANT, entry.timesheet_id.unwrap())
        .await
        .unwrap();
    assert_eq!(totals.total_minutes, 135);
    assert_eq!(totals.billable_minutes, 45);
    assert_eq!(totals.non_billable_minutes, 90);
    assert_eq!(totals.per_day.get(&d("2024-06-03")), Some(&90));
    assert_eq!(totals.per_day.get(&d("2024-06-04")), Some(&45));
}
