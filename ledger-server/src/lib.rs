//! Ledger Server - Time & Leave Ledger Engine
//!
//! The subsystem that turns raw clock events and leave requests into
//! auditable, balance-consistent records: time entries, weekly timesheets
//! with an approval workflow, leave requests against a per-year balance
//! ledger, and effective-dated manager history.
//!
//! # Module structure
//!
//! ```text
//! ledger-server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── services/      # The engine: billing, validation, ledger, workflows
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── audit/         # Append-only workflow audit trail
//! ├── notify.rs      # Notification boundary (trait + log impl)
//! └── utils/         # Errors, time helpers, validation helpers, logger
//! ```

pub mod api;
pub mod audit;
pub mod core;
pub mod db;
pub mod notify;
pub mod services;
pub mod utils;

// Re-export common types
pub use core::{Config, EngineSettings, Server, ServerState};
pub use db::DbService;
pub use notify::{LogNotifier, Notifier};
pub use utils::{AppError, AppResponse, AppResult, FieldErrors};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
