//! Leave Balance API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use shared::models::LeaveBalance;

use crate::api::context::TenantCtx;
use crate::core::ServerState;
use crate::services;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(serde::Deserialize)]
pub struct BalanceQuery {
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub year: i32,
}

/// GET /api/leave-balances?employee_id=..&leave_type_id=..&year=..
pub async fn get_balance(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<BalanceQuery>,
) -> AppResult<Json<AppResponse<LeaveBalance>>> {
    let balance = services::leave_balance::get_balance(
        &state,
        ctx.tenant_id,
        query.employee_id,
        query.leave_type_id,
        query.year,
    )
    .await?;
    Ok(ok(balance))
}

#[derive(serde::Deserialize)]
pub struct InitializeBody {
    pub employee_id: i64,
    pub year: i32,
}

/// POST /api/leave-balances/initialize
pub async fn initialize(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(body): Json<InitializeBody>,
) -> AppResult<Json<AppResponse<Vec<LeaveBalance>>>> {
    let balances = services::leave_balance::initialize_balances(
        &state,
        ctx.tenant_id,
        body.employee_id,
        body.year,
    )
    .await?;
    Ok(ok(balances))
}

#[derive(serde::Deserialize)]
pub struct AccrueBody {
    pub employee_id: i64,
    pub leave_type_id: i64,
    pub year: i32,
}

/// POST /api/leave-balances/accrue
pub async fn accrue(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(body): Json<AccrueBody>,
) -> AppResult<Json<AppResponse<LeaveBalance>>> {
    let balance = services::leave_balance::accrue(
        &state,
        ctx.tenant_id,
        body.employee_id,
        body.leave_type_id,
        body.year,
    )
    .await?;
    Ok(ok(balance))
}
