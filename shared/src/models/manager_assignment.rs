//! Manager Assignment Model
//!
//! Effective-dated employee→manager edge. Per employee the history is a
//! sequence of non-overlapping inclusive intervals with at most one open
//! row (`effective_to` NULL). History is append-only: a change closes the
//! current interval and opens a new one, except same-day corrections which
//! mutate the current interval's manager in place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One interval of the employee→manager history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ManagerAssignment {
    pub id: i64,
    pub tenant_id: i64,
    pub employee_id: i64,
    pub manager_id: i64,
    /// Inclusive
    pub effective_from: NaiveDate,
    /// Inclusive; NULL = currently open
    pub effective_to: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ManagerAssignment {
    /// Whether `date` falls inside this interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.is_none_or(|to| date <= to)
    }
}
