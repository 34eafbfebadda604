//! Project and Task Models
//!
//! Minimal slice of the CRM project domain: enough for time-entry
//! association rules (project access, task-belongs-to-project) and the
//! billing-rate chain. The full project module lives outside the engine.

use serde::{Deserialize, Serialize};

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Project {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    /// Third candidate in the billing-rate fallback chain
    pub billing_rate: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create project payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    pub billing_rate: Option<f64>,
}

/// Task record - always belongs to one project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Task {
    pub id: i64,
    pub tenant_id: i64,
    pub project_id: i64,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}
