//! Absence API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use shared::models::{Absence, AbsenceCreate, AbsenceUpdate};

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

/// GET /api/absences?employee_id=..
pub async fn list(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Absence>>>> {
    let absences = services::absence::list_for_employee(
        &state,
        ctx.tenant_id,
        query.employee_id,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(ok(absences))
}

/// GET /api/absences/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Absence>>> {
    let absence = services::absence::fetch(&state, ctx.tenant_id, id).await?;
    Ok(ok(absence))
}

/// POST /api/absences
pub async fn create(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(payload): Json<AbsenceCreate>,
) -> AppResult<Json<AppResponse<Absence>>> {
    let absence = services::absence::create(&state, ctx.tenant_id, payload).await?;
    Ok(ok(absence))
}

/// PUT /api/absences/:id
pub async fn update(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
    Json(payload): Json<AbsenceUpdate>,
) -> AppResult<Json<AppResponse<Absence>>> {
    let absence = services::absence::update(&state, ctx.tenant_id, id, payload).await?;
    Ok(ok(absence))
}

/// POST /api/absences/:id/approve
pub async fn approve(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Absence>>> {
    let absence = services::absence::approve(&state, ctx.tenant_id, id, ctx.actor_id).await?;
    Ok(ok(absence))
}

#[derive(serde::Deserialize)]
pub struct ReasonBody {
    pub reason: String,
}

/// POST /api/absences/:id/reject
pub async fn reject(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
    Json(body): Json<ReasonBody>,
) -> AppResult<Json<AppResponse<Absence>>> {
    let absence =
        services::absence::reject(&state, ctx.tenant_id, id, ctx.actor_id, &body.reason).await?;
    Ok(ok(absence))
}

/// POST /api/absences/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
    Json(body): Json<ReasonBody>,
) -> AppResult<Json<AppResponse<Absence>>> {
    let absence =
        services::absence::cancel(&state, ctx.tenant_id, id, ctx.actor_id, &body.reason).await?;
    Ok(ok(absence))
}

#[derive(serde::Deserialize)]
pub struct OverlapQuery {
    pub employee_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// GET /api/absences/overlap?employee_id=..&start_date=..&end_date=..
pub async fn overlap(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<OverlapQuery>,
) -> AppResult<Json<AppResponse<Vec<Absence>>>> {
    let absences = services::absence::check_overlap(
        &state,
        ctx.tenant_id,
        query.employee_id,
        query.start_date,
        query.end_date,
    )
    .await?;
    Ok(ok(absences))
}
