//! Timesheet API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/timesheets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/for-date", get(handler::for_date))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/totals", get(handler::totals))
        .route("/{id}/submit", post(handler::submit))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/unlock", post(handler::unlock))
}
