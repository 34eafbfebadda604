//! Service scenario tests over an in-memory database.

use chrono::NaiveDate;
use shared::models::{
    Employee, EmployeeCreate, LeaveType, LeaveTypeCreate, Project, ProjectCreate, TimeCategory,
    TimeCategoryCreate, TimeEntryInput,
};

use crate::core::{Config, EngineSettings, ServerState};
use crate::db::{DbService, repository};

mod absences;
mod clock;
mod entries;
mod timesheets;

const TENANT: i64 = 1;

fn test_config(engine: EngineSettings) -> Config {
    Config {
        work_dir: "/tmp/ledger-test".into(),
        http_port: 0,
        environment: "test".into(),
        engine,
    }
}

async fn test_state() -> ServerState {
    test_state_with(EngineSettings::default()).await
}

async fn test_state_with(engine: EngineSettings) -> ServerState {
    let db = DbService::open_in_memory().await.unwrap();
    ServerState::with_db(test_config(engine), db)
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn seed_employee(state: &ServerState, name: &str, user_id: Option<i64>) -> Employee {
    repository::employee::create(
        state.pool(),
        TENANT,
        EmployeeCreate {
            display_name: name.to_string(),
            email: None,
            user_id,
            default_billing_rate: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_leave_type(
    state: &ServerState,
    name: &str,
    requires_approval: bool,
    max_days_per_year: f64,
) -> LeaveType {
    repository::leave_type::create(
        state.pool(),
        TENANT,
        LeaveTypeCreate {
            name: name.to_string(),
            requires_approval,
            accrual_rate: 0.0,
            accrual_frequency: Default::default(),
            max_days_per_year,
        },
    )
    .await
    .unwrap()
}

async fn seed_category(
    state: &ServerState,
    name: &str,
    billable_default: bool,
    rate: Option<f64>,
) -> TimeCategory {
    repository::time_category::create(
        state.pool(),
        TENANT,
        TimeCategoryCreate {
            name: name.to_string(),
            is_billable_default: billable_default,
            default_billing_rate: rate,
        },
    )
    .await
    .unwrap()
}

async fn seed_project(state: &ServerState, name: &str, rate: Option<f64>) -> Project {
    repository::project::create(
        state.pool(),
        TENANT,
        ProjectCreate {
            name: name.to_string(),
            billing_rate: rate,
        },
    )
    .await
    .unwrap()
}

/// Duration-only entry input attached to a category.
fn entry_input(employee_id: i64, date: &str, minutes: i64, category_id: i64) -> TimeEntryInput {
    TimeEntryInput {
        employee_id,
        entry_date: Some(d(date)),
        duration_minutes: Some(minutes),
        category_id: Some(category_id),
        ..Default::default()
    }
}

/// Entry input with an explicit start/end window (Unix millis, UTC).
fn windowed_input(
    employee_id: i64,
    date: &str,
    start_hm: (u32, u32),
    end_hm: (u32, u32),
    category_id: i64,
) -> TimeEntryInput {
    let day = d(date);
    let start =
        crate::utils::time::date_hms_to_millis(day, start_hm.0, start_hm.1, 0, chrono_tz::UTC);
    let end = crate::utils::time::date_hms_to_millis(day, end_hm.0, end_hm.1, 0, chrono_tz::UTC);
    TimeEntryInput {
        employee_id,
        entry_date: Some(day),
        start_time: Some(start),
        end_time: Some(end),
        category_id: Some(category_id),
        ..Default::default()
    }
}
