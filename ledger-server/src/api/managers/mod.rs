//! Manager Assignment API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/managers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/assign", post(handler::assign))
        .route("/assign-many", post(handler::assign_many))
        .route("/for-date", get(handler::for_date))
        .route("/history", get(handler::history))
}
