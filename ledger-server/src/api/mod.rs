//! API Route Modules
//!
//! Thin axum handlers over the service layer, one module per resource.
//! Tenant/actor identity is extracted per request by
//! [`context::TenantCtx`]; business rules live entirely in `services`.

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::ServerState;

pub mod context;

pub mod absences;
pub mod health;
pub mod leave_balances;
pub mod managers;
pub mod time_clock;
pub mod time_entries;
pub mod timesheets;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Build a router with all resource routes registered (no middleware).
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(time_entries::router())
        .merge(time_clock::router())
        .merge(timesheets::router())
        .merge(absences::router())
        .merge(leave_balances::router())
        .merge(managers::router())
}

/// Fully configured application: routes, middleware, state.
pub fn create_router(state: ServerState) -> Router {
    build_router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
