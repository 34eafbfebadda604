//! Leave Balance API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leave-balances", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_balance))
        .route("/initialize", post(handler::initialize))
        .route("/accrue", post(handler::accrue))
}
