//! Domain models for the time & leave ledger engine.
//!
//! Every entity carries an explicit `tenant_id`; the engine never resolves
//! a tenant from ambient state. Timestamps are Unix millis (i64), calendar
//! dates are `NaiveDate` serialized as `YYYY-MM-DD`.

pub mod absence;
pub mod employee;
pub mod leave_balance;
pub mod leave_type;
pub mod manager_assignment;
pub mod project;
pub mod time_category;
pub mod time_entry;
pub mod timesheet;

pub use absence::{Absence, AbsenceCreate, AbsenceStatus, AbsenceUpdate, absence_duration_days};
pub use employee::{Employee, EmployeeCreate};
pub use leave_balance::LeaveBalance;
pub use leave_type::{AccrualFrequency, LeaveType, LeaveTypeCreate};
pub use manager_assignment::ManagerAssignment;
pub use project::{Project, ProjectCreate, Task};
pub use time_category::{TimeCategory, TimeCategoryCreate};
pub use time_entry::{ApprovalStatus, TimeEntry, TimeEntryInput, TimeEntryUpdate};
pub use timesheet::{Timesheet, TimesheetStatus, TimesheetTotals, TransitionError};
