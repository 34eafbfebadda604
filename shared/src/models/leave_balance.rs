//! Leave Balance Model
//!
//! One ledger row per (employee, leave type, year). The derived
//! `available_days` column obeys one conservation law, recomputed and
//! persisted by every mutation before it returns:
//!
//! ```text
//! available = allocated + carried_over − used − pending
//! ```

use serde::{Deserialize, Serialize};

/// Leave balance ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveBalance {
    pub id: i64,
    pub tenant_id: i64,
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub year: i32,
    pub allocated_days: f64,
    /// Committed deductions (approved leave)
    pub used_days: f64,
    /// Reservations held against the balance before approval
    pub pending_days: f64,
    /// Derived; see the module-level conservation law
    pub available_days: f64,
    pub carried_over_days: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LeaveBalance {
    /// Recompute the derived column from the raw ones.
    pub fn computed_available(&self) -> f64 {
        self.allocated_days + self.carried_over_days - self.used_days - self.pending_days
    }
}
