//! Time Category Model

use serde::{Deserialize, Serialize};

/// Time category configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeCategory {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub is_active: bool,
    /// Default for the entry's billable flag when not supplied
    pub is_billable_default: bool,
    /// Second candidate in the billing-rate fallback chain
    pub default_billing_rate: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create time category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeCategoryCreate {
    pub name: String,
    #[serde(default)]
    pub is_billable_default: bool,
    pub default_billing_rate: Option<f64>,
}
