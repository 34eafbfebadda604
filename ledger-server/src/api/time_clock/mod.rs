//! Time Clock API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/time-clock", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/in", post(handler::clock_in))
        .route("/out", post(handler::clock_out))
        .route("/active", get(handler::active))
}
