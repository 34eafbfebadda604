//! Timesheet API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use shared::models::{Timesheet, TimesheetTotals};

use crate::api::context::TenantCtx;
use crate::core::ServerState;
use crate::services;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub employee_id: i64,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/timesheets?employee_id=..
pub async fn list(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Timesheet>>>> {
    let sheets = services::timesheet::list_for_employee(
        &state,
        ctx.tenant_id,
        query.employee_id,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(ok(sheets))
}

#[derive(serde::Deserialize)]
pub struct ForDateQuery {
    pub employee_id: i64,
    pub date: NaiveDate,
}

/// GET /api/timesheets/for-date?employee_id=..&date=..
///
/// Returns the timesheet for the period containing the date, creating a
/// DRAFT one when none exists yet.
pub async fn for_date(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<ForDateQuery>,
) -> AppResult<Json<AppResponse<Timesheet>>> {
    let sheet = services::timesheet::get_or_create_for_date(
        &state,
        ctx.tenant_id,
        query.employee_id,
        query.date,
    )
    .await?;
    Ok(ok(sheet))
}

/// GET /api/timesheets/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Timesheet>>> {
    let sheet = services::timesheet::fetch(&state, ctx.tenant_id, id).await?;
    Ok(ok(sheet))
}

/// GET /api/timesheets/:id/totals
pub async fn totals(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<TimesheetTotals>>> {
    let totals = services::timesheet::totals(&state, ctx.tenant_id, id).await?;
    Ok(ok(totals))
}

/// POST /api/timesheets/:id/submit
pub async fn submit(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Timesheet>>> {
    let actor = ctx.require_actor()?;
    let sheet = services::timesheet::submit(&state, ctx.tenant_id, id, actor).await?;
    Ok(ok(sheet))
}

/// POST /api/timesheets/:id/approve
pub async fn approve(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Timesheet>>> {
    let approver = ctx.require_actor()?;
    let sheet = services::timesheet::approve(&state, ctx.tenant_id, id, approver).await?;
    Ok(ok(sheet))
}

#[derive(serde::Deserialize)]
pub struct RejectBody {
    pub reason: String,
}

/// POST /api/timesheets/:id/reject
pub async fn reject(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
    Json(body): Json<RejectBody>,
) -> AppResult<Json<AppResponse<Timesheet>>> {
    let approver = ctx.require_actor()?;
    let sheet =
        services::timesheet::reject(&state, ctx.tenant_id, id, approver, &body.reason).await?;
    Ok(ok(sheet))
}

/// POST /api/timesheets/:id/unlock
pub async fn unlock(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Timesheet>>> {
    let actor = ctx.require_actor()?;
    let sheet = services::timesheet::unlock(&state, ctx.tenant_id, id, actor).await?;
    Ok(ok(sheet))
}
