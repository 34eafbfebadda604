//! Shared types for the ops-suite ledger engine
//!
//! Domain models, payload DTOs and status state machines used by the
//! ledger server. Enable the `db` feature to get `sqlx::FromRow` derives
//! on the entity structs.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
