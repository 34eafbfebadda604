//! Time Entry Model
//!
//! One unit of logged work, produced by the time clock or direct entry.
//! Approval status always mirrors the owning timesheet after a timesheet
//! transition (cascade), so an entry never shows a different state than
//! its locked sheet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-entry approval status, cascaded from the owning timesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Time entry record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeEntry {
    pub id: i64,
    pub tenant_id: i64,
    pub employee_id: i64,
    pub entry_date: NaiveDate,
    /// Session start (Unix millis); NULL for duration-only entries
    pub start_time: Option<i64>,
    /// Session end (Unix millis); NULL while the clock is running
    pub end_time: Option<i64>,
    /// Derived from start/end when both present, supplied directly otherwise
    pub duration_minutes: i64,
    pub description: Option<String>,
    pub billable: bool,
    /// Resolved hourly rate; present only when billable
    pub billing_rate: Option<f64>,
    /// rate × hours, rounded to 2 decimals; present only when billable
    pub billing_amount: Option<f64>,
    pub project_id: Option<i64>,
    pub company_id: Option<i64>,
    pub task_id: Option<i64>,
    pub category_id: Option<i64>,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<i64>,
    pub approved_at: Option<i64>,
    pub timesheet_id: Option<i64>,
    /// IANA timezone name the entry was recorded in
    pub timezone: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TimeEntry {
    /// Whether the entry is still open for edits and deletion.
    ///
    /// Editability is owned by the entry state, not by the calling
    /// service: once the owning timesheet is approved the cascade marks
    /// the entry APPROVED and it freezes until the sheet is unlocked.
    pub fn can_be_edited(&self) -> bool {
        self.approval_status != ApprovalStatus::Approved
    }

    /// True while this entry is a running clock session.
    pub fn is_open_session(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_none()
    }
}

/// Input for creating a time entry (also the shape re-validated on update,
/// after merging the patch into the stored entry)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeEntryInput {
    pub employee_id: i64,
    pub entry_date: Option<NaiveDate>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    /// Defaults from the time category when not supplied
    pub billable: Option<bool>,
    /// Per-entry override rate, first candidate in the billing chain
    pub billing_rate: Option<f64>,
    pub project_id: Option<i64>,
    pub company_id: Option<i64>,
    pub task_id: Option<i64>,
    pub category_id: Option<i64>,
    pub timezone: Option<String>,
}

/// Partial update payload for a time entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeEntryUpdate {
    pub entry_date: Option<NaiveDate>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub description: Option<String>,
    pub billable: Option<bool>,
    pub billing_rate: Option<f64>,
    pub project_id: Option<i64>,
    pub company_id: Option<i64>,
    pub task_id: Option<i64>,
    pub category_id: Option<i64>,
    pub timezone: Option<String>,
}
