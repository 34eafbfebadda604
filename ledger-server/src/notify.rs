//! Notification Boundary
//!
//! Delivery transport lives outside the engine; the services only see this
//! trait. Dispatch happens after the owning transaction commits, and a
//! failed notification is logged, never bubbled up to the caller.

use async_trait::async_trait;
use shared::models::Timesheet;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn timesheet_approved(&self, timesheet: &Timesheet) -> anyhow::Result<()>;

    async fn timesheet_rejected(&self, timesheet: &Timesheet, reason: &str) -> anyhow::Result<()>;
}

/// Default notifier: emits tracing events only.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn timesheet_approved(&self, timesheet: &Timesheet) -> anyhow::Result<()> {
        tracing::info!(
            timesheet_id = timesheet.id,
            employee_id = timesheet.employee_id,
            "timesheet approved notification"
        );
        Ok(())
    }

    async fn timesheet_rejected(&self, timesheet: &Timesheet, reason: &str) -> anyhow::Result<()> {
        tracing::info!(
            timesheet_id = timesheet.id,
            employee_id = timesheet.employee_id,
            reason,
            "timesheet rejected notification"
        );
        Ok(())
    }
}
