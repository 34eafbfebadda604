//! Leave Type Model

use serde::{Deserialize, Serialize};

/// How often an accrual increment is added to the allocated days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum AccrualFrequency {
    Monthly,
    Yearly,
    None,
}

impl Default for AccrualFrequency {
    fn default() -> Self {
        Self::None
    }
}

/// Leave type configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveType {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    /// When false, requests auto-approve on creation (no reservation step)
    pub requires_approval: bool,
    /// Days added per accrual period; 0 disables accrual
    pub accrual_rate: f64,
    pub accrual_frequency: AccrualFrequency,
    /// Yearly allocation seeded by `initialize_balances`
    pub max_days_per_year: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LeaveType {
    pub fn accrues(&self) -> bool {
        self.accrual_rate > 0.0 && self.accrual_frequency != AccrualFrequency::None
    }
}

/// Create leave type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveTypeCreate {
    pub name: String,
    #[serde(default = "default_true")]
    pub requires_approval: bool,
    #[serde(default)]
    pub accrual_rate: f64,
    #[serde(default)]
    pub accrual_frequency: AccrualFrequency,
    #[serde(default)]
    pub max_days_per_year: f64,
}

fn default_true() -> bool {
    true
}
