//! Timesheet Model
//!
//! One weekly period per employee. The status enum is an explicit state
//! machine: every transition goes through a guard method that returns the
//! next status or a [`TransitionError`], so services never compare raw
//! status strings to decide what is legal.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rejected timesheet transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Timesheet is already approved, unlock it first")]
    AlreadyApproved,

    #[error("Only a pending timesheet can be {0}")]
    NotPending(&'static str),

    #[error("Only an approved timesheet can be unlocked")]
    NotApproved,
}

/// Timesheet approval status
///
/// ```text
/// DRAFT ──submit──▶ PENDING ──approve──▶ APPROVED
///                      │  ▲                  │
///                      │  └────unlock────────┘
///                   reject
///                      ▼
///                  REJECTED ──submit (resubmit)──▶ PENDING
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum TimesheetStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl Default for TimesheetStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl TimesheetStatus {
    /// Submit for approval. Legal from DRAFT, REJECTED (resubmission) and
    /// PENDING (re-submit after edits); an approved sheet must be unlocked
    /// first.
    pub fn submit(self) -> Result<Self, TransitionError> {
        match self {
            Self::Approved => Err(TransitionError::AlreadyApproved),
            _ => Ok(Self::Pending),
        }
    }

    pub fn approve(self) -> Result<Self, TransitionError> {
        match self {
            Self::Pending => Ok(Self::Approved),
            _ => Err(TransitionError::NotPending("approved")),
        }
    }

    pub fn reject(self) -> Result<Self, TransitionError> {
        match self {
            Self::Pending => Ok(Self::Rejected),
            _ => Err(TransitionError::NotPending("rejected")),
        }
    }

    /// The only path back from APPROVED.
    pub fn unlock(self) -> Result<Self, TransitionError> {
        match self {
            Self::Approved => Ok(Self::Pending),
            _ => Err(TransitionError::NotApproved),
        }
    }
}

/// Timesheet record - one weekly period for one employee
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Timesheet {
    pub id: i64,
    pub tenant_id: i64,
    pub employee_id: i64,
    /// First day of the weekly period
    pub period_start: NaiveDate,
    /// Last day of the weekly period (period_start + 6)
    pub period_end: NaiveDate,
    pub status: TimesheetStatus,
    /// Manager expected to approve, resolved for the period end
    pub approver_id: Option<i64>,
    /// Submission deadline (Unix millis), advisory for reminder logic
    pub deadline: Option<i64>,
    pub submitted_at: Option<i64>,
    pub approved_at: Option<i64>,
    pub rejected_at: Option<i64>,
    pub rejection_reason: Option<String>,
    /// Set while APPROVED; an approved sheet is locked for editing
    pub locked_at: Option<i64>,
    pub locked_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Aggregated minutes over the entries of one timesheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimesheetTotals {
    pub total_minutes: i64,
    pub billable_minutes: i64,
    pub non_billable_minutes: i64,
    /// Minutes per day, keyed by date
    pub per_day: BTreeMap<NaiveDate, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_transition_cycle() {
        let s = TimesheetStatus::Draft.submit().unwrap();
        assert_eq!(s, TimesheetStatus::Pending);
        let s = s.approve().unwrap();
        assert_eq!(s, TimesheetStatus::Approved);
        let s = s.unlock().unwrap();
        assert_eq!(s, TimesheetStatus::Pending);
        let s = s.reject().unwrap();
        assert_eq!(s, TimesheetStatus::Rejected);
        assert_eq!(s.submit().unwrap(), TimesheetStatus::Pending);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        assert_eq!(
            TimesheetStatus::Approved.submit(),
            Err(TransitionError::AlreadyApproved)
        );
        assert_eq!(
            TimesheetStatus::Draft.approve(),
            Err(TransitionError::NotPending("approved"))
        );
        assert_eq!(
            TimesheetStatus::Rejected.reject(),
            Err(TransitionError::NotPending("rejected"))
        );
        assert_eq!(
            TimesheetStatus::Pending.unlock(),
            Err(TransitionError::NotApproved)
        );
    }
}
