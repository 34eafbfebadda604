//! Service Layer
//!
//! The engine proper, one module per concern:
//!
//! - **billing**: rate resolution and amount arithmetic
//! - **validation**: the single gatekeeper for time-entry/absence input
//! - **leave_balance**: the allocated/used/pending/available ledger
//! - **manager_assignment**: effective-dated employee→manager history
//! - **time_clock**: live session start/stop
//! - **time_entry**: entry CRUD and approval transitions
//! - **timesheet**: weekly aggregation and the approval workflow
//! - **absence**: leave requests orchestrating the ledger
//!
//! # Data flow
//!
//! ```text
//! clock / direct entry → validation → billing → time_entry rows
//!                                                     │
//!                             timesheet (weekly) ─────┘ cascade on
//!                                                       approve/reject/unlock
//! absence → validation → leave_balance (reserve/commit/release/restore)
//! manager_assignment → approver for timesheet submission
//! ```

pub mod absence;
pub mod billing;
pub mod leave_balance;
pub mod manager_assignment;
pub mod time_clock;
pub mod time_entry;
pub mod timesheet;
pub mod validation;

#[cfg(test)]
mod tests;
