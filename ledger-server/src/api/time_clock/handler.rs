//! Time Clock API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use shared::models::TimeEntry;

use crate::api::context::TenantCtx;
use crate::core::ServerState;
use crate::services::{self, time_clock::ClockInRequest};
use crate::utils::{AppResponse, AppResult, ok};

#[derive(serde::Deserialize)]
pub struct ClockInBody {
    pub employee_id: i64,
    #[serde(flatten)]
    pub request: ClockInRequest,
}

/// POST /api/time-clock/in
pub async fn clock_in(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(body): Json<ClockInBody>,
) -> AppResult<Json<AppResponse<TimeEntry>>> {
    let entry =
        services::time_clock::clock_in(&state, ctx.tenant_id, body.employee_id, body.request)
            .await?;
    Ok(ok(entry))
}

#[derive(serde::Deserialize)]
pub struct ClockOutBody {
    pub employee_id: i64,
    pub notes: Option<String>,
}

/// POST /api/time-clock/out
pub async fn clock_out(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(body): Json<ClockOutBody>,
) -> AppResult<Json<AppResponse<TimeEntry>>> {
    let entry =
        services::time_clock::clock_out(&state, ctx.tenant_id, body.employee_id, body.notes)
            .await?;
    Ok(ok(entry))
}

#[derive(serde::Deserialize)]
pub struct ActiveQuery {
    pub employee_id: i64,
}

/// GET /api/time-clock/active?employee_id=..
pub async fn active(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<ActiveQuery>,
) -> AppResult<Json<AppResponse<Option<TimeEntry>>>> {
    let session =
        services::time_clock::active_session(&state, ctx.tenant_id, query.employee_id).await?;
    Ok(ok(session))
}
