//! Time entry CRUD and validation scenarios.

use shared::models::{ApprovalStatus, TimeEntryInput, TimeEntryUpdate};

use super::*;
use crate::services::time_entry;
use crate::utils::AppError;

fn expect_field(err: AppError, field: &str) -> String {
    match err {
        AppError::Validation(fields) => fields
            .get(field)
            .unwrap_or_else(|| panic!("no error on {field}: {fields:?}"))
            .to_string(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn duration_entry_is_created_pending() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ana", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let entry = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 60, category.id),
    )
    .await
    .unwrap();
    assert_eq!(entry.duration_minutes, 60);
    assert_eq!(entry.approval_status, ApprovalStatus::Pending);
    assert!(entry.timesheet_id.is_some());
    assert!(!entry.billable);
}

#[tokio::test]
async fn approval_disabled_creates_entries_approved() {
    let state = test_state_with(EngineSettings {
        approval_enabled: false,
        ..Default::default()
    })
    .await;
    let employee = seed_employee(&state, "Ben", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let entry = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 60, category.id),
    )
    .await
    .unwrap();
    assert_eq!(entry.approval_status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn start_and_end_must_come_together() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Cleo", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let mut input = windowed_input(employee.id, "2024-06-03", (9, 0), (10, 0), category.id);
    input.end_time = None;
    let message = expect_field(
        time_entry::create(&state, TENANT, input).await.unwrap_err(),
        "end_time",
    );
    assert!(message.contains("together"));
}

#[tokio::test]
async fn end_must_be_after_start() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Dia", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let input = windowed_input(employee.id, "2024-06-03", (10, 0), (9, 0), category.id);
    let message = expect_field(
        time_entry::create(&state, TENANT, input).await.unwrap_err(),
        "end_time",
    );
    assert!(message.contains("after start time"));
}

#[tokio::test]
async fn duration_is_required_without_a_window() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Eli", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let input = TimeEntryInput {
        employee_id: employee.id,
        entry_date: Some(d("2024-06-03")),
        category_id: Some(category.id),
        ..Default::default()
    };
    expect_field(
        time_entry::create(&state, TENANT, input).await.unwrap_err(),
        "duration_minutes",
    );
}

#[tokio::test]
async fn at_least_one_association_is_required() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Fay", None).await;

    let input = TimeEntryInput {
        employee_id: employee.id,
        entry_date: Some(d("2024-06-03")),
        duration_minutes: Some(30),
        ..Default::default()
    };
    expect_field(
        time_entry::create(&state, TENANT, input).await.unwrap_err(),
        "project_id",
    );
}

#[tokio::test]
async fn billable_entries_need_a_project_or_company() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Gus", None).await;
    // Billable by category default, but no project or company attached
    let category = seed_category(&state, "Consulting", true, Some(90.0)).await;

    let message = expect_field(
        time_entry::create(
            &state,
            TENANT,
            entry_input(employee.id, "2024-06-03", 60, category.id),
        )
        .await
        .unwrap_err(),
        "billable",
    );
    assert!(message.contains("project or company"));
}

#[tokio::test]
async fn overlapping_windows_are_rejected_and_touching_ones_are_not() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Hal", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    time_entry::create(
        &state,
        TENANT,
        windowed_input(employee.id, "2024-06-03", (9, 0), (9, 30), category.id),
    )
    .await
    .unwrap();

    let message = expect_field(
        time_entry::create(
            &state,
            TENANT,
            windowed_input(employee.id, "2024-06-03", (9, 15), (9, 45), category.id),
        )
        .await
        .unwrap_err(),
        "start_time",
    );
    assert!(message.contains("09:00"));
    assert!(message.contains("09:30"));

    // Half-open: starting exactly at the previous end is legal
    time_entry::create(
        &state,
        TENANT,
        windowed_input(employee.id, "2024-06-03", (9, 30), (10, 0), category.id),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn editing_an_entry_excludes_itself_from_overlap() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Ida", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let entry = time_entry::create(
        &state,
        TENANT,
        windowed_input(employee.id, "2024-06-03", (9, 0), (9, 30), category.id),
    )
    .await
    .unwrap();

    // Extend the same entry over its own old window
    let shifted = windowed_input(employee.id, "2024-06-03", (9, 0), (10, 0), category.id);
    let updated = time_entry::update(
        &state,
        TENANT,
        entry.id,
        TimeEntryUpdate {
            end_time: shifted.end_time,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.duration_minutes, 60);
}

#[tokio::test]
async fn approved_entries_cannot_be_edited_or_deleted() {
    let state = test_state_with(EngineSettings {
        approval_enabled: false,
        ..Default::default()
    })
    .await;
    let employee = seed_employee(&state, "Joe", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let entry = time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 60, category.id),
    )
    .await
    .unwrap();
    assert_eq!(entry.approval_status, ApprovalStatus::Approved);

    let err = time_entry::update(
        &state,
        TENANT,
        entry.id,
        TimeEntryUpdate {
            duration_minutes: Some(90),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    let err = time_entry::delete(&state, TENANT, entry.id).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));

    // Re-submission reopens it for editing
    time_entry::submit_for_approval(&state, TENANT, entry.id)
        .await
        .unwrap();
    time_entry::update(
        &state,
        TENANT,
        entry.id,
        TimeEntryUpdate {
            duration_minutes: Some(90),
            ..Default::default()
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn bulk_create_is_all_or_nothing() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Kim", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    let good = entry_input(employee.id, "2024-06-03", 60, category.id);
    let bad = TimeEntryInput {
        employee_id: employee.id,
        entry_date: Some(d("2024-06-04")),
        duration_minutes: Some(30),
        ..Default::default()
    };
    let err = time_entry::bulk_create(&state, TENANT, vec![good, bad])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let on_day = time_entry::list_for_date(&state, TENANT, employee.id, d("2024-06-03"))
        .await
        .unwrap();
    assert!(on_day.is_empty());
}

#[tokio::test]
async fn total_hours_rounds_to_two_decimals() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Lea", None).await;
    let category = seed_category(&state, "Admin", false, None).await;

    time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 90, category.id),
    )
    .await
    .unwrap();
    time_entry::create(
        &state,
        TENANT,
        entry_input(employee.id, "2024-06-03", 45, category.id),
    )
    .await
    .unwrap();

    let hours = time_entry::total_hours(&state, TENANT, employee.id, d("2024-06-03"))
        .await
        .unwrap();
    assert_eq!(hours, 2.25);
}

#[tokio::test]
async fn billable_entry_is_priced_through_the_fallback_chain() {
    let state = test_state().await;
    let employee = seed_employee(&state, "Mia", None).await;
    let category = seed_category(&state, "Consulting", true, Some(75.0)).await;
    let project = seed_project(&state, "Redesign", Some(120.0)).await;

    let input = TimeEntryInput {
        project_id: Some(project.id),
        ..entry_input(employee.id, "2024-06-03", 90, category.id)
    };
    let entry = time_entry::create(&state, TENANT, input).await.unwrap();
    assert!(entry.billable);
    // Category outranks project in the chain
    assert_eq!(entry.billing_rate, Some(75.0));
    assert_eq!(entry.billing_amount, Some(112.5));
}
