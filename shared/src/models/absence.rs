//! Absence Model
//!
//! One leave request. Date ranges are inclusive on both ends; the duration
//! in days is always derived from the range, never stored independently of
//! it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Leave request status
///
/// PENDING → {APPROVED, REJECTED, CANCELLED}; APPROVED → CANCELLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum AbsenceStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl Default for AbsenceStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl AbsenceStatus {
    pub fn can_be_approved(self) -> bool {
        self == Self::Pending
    }

    pub fn can_be_rejected(self) -> bool {
        self == Self::Pending
    }

    /// Pending requests and already-approved leave can both be cancelled;
    /// rejected or cancelled requests are final.
    pub fn can_be_cancelled(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    /// Only pending requests may be edited.
    pub fn can_be_edited(self) -> bool {
        self == Self::Pending
    }
}

/// Duration of an inclusive date range, in days.
///
/// Same derivation the validator uses for the balance check, so the
/// reserved amount always matches what the absence itself will carry.
pub fn absence_duration_days(start: NaiveDate, end: NaiveDate) -> f64 {
    ((end - start).num_days() + 1) as f64
}

/// Absence record - one leave request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Absence {
    pub id: i64,
    pub tenant_id: i64,
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub start_date: NaiveDate,
    /// Inclusive
    pub end_date: NaiveDate,
    /// Derived: inclusive day count of [start_date, end_date]
    pub duration_days: f64,
    pub status: AbsenceStatus,
    pub approver_id: Option<i64>,
    pub approved_at: Option<i64>,
    pub rejection_reason: Option<String>,
    /// Free-text notes; cancellation reasons are appended here
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Absence {
    /// Ledger year the request draws from.
    pub fn balance_year(&self) -> i32 {
        use chrono::Datelike;
        self.start_date.year()
    }
}

/// Create absence payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenceCreate {
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

/// Update absence payload (only legal while PENDING)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbsenceUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}
