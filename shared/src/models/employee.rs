//! Employee Model

use serde::{Deserialize, Serialize};

/// Employee record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub tenant_id: i64,
    pub display_name: String,
    pub email: Option<String>,
    /// Link to the external identity account; NULL for employees without
    /// a login (project access checks treat those as unrestricted)
    pub user_id: Option<i64>,
    /// Denormalized cache of the current manager. Written only by the
    /// manager-assignment service, and only for non-future-dated changes;
    /// the assignment history is the source of truth.
    pub manager_id: Option<i64>,
    /// Fourth candidate in the billing-rate fallback chain
    pub default_billing_rate: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub display_name: String,
    pub email: Option<String>,
    pub user_id: Option<i64>,
    pub default_billing_rate: Option<f64>,
}
