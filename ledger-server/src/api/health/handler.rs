//! Health API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(serde::Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: String,
}

/// GET /api/health
pub async fn health(State(state): State<ServerState>) -> AppResult<Json<AppResponse<HealthStatus>>> {
    // A failing pool should flip the health check, not hide behind it.
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.pool())
        .await?;

    Ok(ok(HealthStatus {
        status: "ok",
        environment: state.config.environment.clone(),
    }))
}
