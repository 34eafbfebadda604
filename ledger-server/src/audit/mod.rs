//! Audit Log Module
//!
//! Append-only trail of workflow transitions. Actions are an enum rather
//! than free text so every recorded operation has a stable identifier.
//! Recording failures are logged and swallowed: an audit write must never
//! roll back the business transaction it describes.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Audit action types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // Timesheet workflow
    TimesheetSubmitted,
    TimesheetApproved,
    TimesheetRejected,
    TimesheetUnlocked,

    // Absence workflow
    AbsenceCreated,
    AbsenceApproved,
    AbsenceRejected,
    AbsenceCancelled,

    // Ledger maintenance
    BalancesInitialized,
    BalanceAccrued,

    // Manager history
    ManagerAssigned,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string(self).unwrap_or_default();
        write!(f, "{}", s.trim_matches('"'))
    }
}

/// Audit log writer over the shared pool
#[derive(Debug, Clone)]
pub struct AuditService {
    pool: SqlitePool,
}

impl AuditService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an action against a resource. Best-effort: failures are
    /// logged at error level and not propagated.
    pub async fn record(
        &self,
        tenant_id: i64,
        actor_id: Option<i64>,
        action: AuditAction,
        resource: &str,
        resource_id: i64,
        details: serde_json::Value,
    ) {
        let now = shared::util::now_millis();
        let result = sqlx::query(
            "INSERT INTO audit_log (tenant_id, actor_id, action, resource, resource_id, details, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(tenant_id)
        .bind(actor_id)
        .bind(action.to_string())
        .bind(resource)
        .bind(resource_id)
        .bind(details.to_string())
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(%action, resource, resource_id, "audit recorded");
            }
            Err(e) => {
                tracing::error!(%action, resource, resource_id, "failed to record audit entry: {}", e);
            }
        }
    }

    /// Entries for one resource, oldest first. Used by tests and the
    /// audit inspection endpoint.
    pub async fn entries_for(
        &self,
        tenant_id: i64,
        resource: &str,
        resource_id: i64,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        sqlx::query_as::<_, AuditEntry>(
            "SELECT id, tenant_id, actor_id, action, resource, resource_id, details, created_at FROM audit_log WHERE tenant_id = ? AND resource = ? AND resource_id = ? ORDER BY id",
        )
        .bind(tenant_id)
        .bind(resource)
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
    }
}

/// One immutable audit row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub tenant_id: i64,
    pub actor_id: Option<i64>,
    pub action: String,
    pub resource: String,
    pub resource_id: i64,
    pub details: Option<String>,
    pub created_at: i64,
}
