//! Manager Assignment API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use shared::models::ManagerAssignment;

use crate::api::context::TenantCtx;
use crate::core::ServerState;
use crate::db::repository::manager_assignment;
use crate::services;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(serde::Deserialize)]
pub struct AssignBody {
    pub employee_id: i64,
    pub manager_id: i64,
    pub effective_from: NaiveDate,
}

/// POST /api/managers/assign
pub async fn assign(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(body): Json<AssignBody>,
) -> AppResult<Json<AppResponse<ManagerAssignment>>> {
    let assignment = services::manager_assignment::assign(
        &state,
        ctx.tenant_id,
        body.employee_id,
        body.manager_id,
        body.effective_from,
    )
    .await?;
    Ok(ok(assignment))
}

#[derive(serde::Deserialize)]
pub struct AssignManyBody {
    pub manager_id: i64,
    pub employee_ids: Vec<i64>,
    pub effective_from: NaiveDate,
}

/// POST /api/managers/assign-many
pub async fn assign_many(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(body): Json<AssignManyBody>,
) -> AppResult<Json<AppResponse<Vec<ManagerAssignment>>>> {
    let assignments = services::manager_assignment::assign_many(
        &state,
        ctx.tenant_id,
        body.manager_id,
        &body.employee_ids,
        body.effective_from,
    )
    .await?;
    Ok(ok(assignments))
}

#[derive(serde::Deserialize)]
pub struct ForDateQuery {
    pub employee_id: i64,
    pub date: NaiveDate,
}

#[derive(serde::Serialize)]
pub struct ManagerForDate {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub manager_id: Option<i64>,
}

/// GET /api/managers/for-date?employee_id=..&date=..
pub async fn for_date(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<ForDateQuery>,
) -> AppResult<Json<AppResponse<ManagerForDate>>> {
    let manager_id = services::manager_assignment::manager_for_date(
        &state,
        ctx.tenant_id,
        query.employee_id,
        query.date,
    )
    .await?;
    Ok(ok(ManagerForDate {
        employee_id: query.employee_id,
        date: query.date,
        manager_id,
    }))
}

#[derive(serde::Deserialize)]
pub struct HistoryQuery {
    pub employee_id: i64,
}

/// GET /api/managers/history?employee_id=..
pub async fn history(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<AppResponse<Vec<ManagerAssignment>>>> {
    let assignments =
        manager_assignment::list_for_employee(state.pool(), ctx.tenant_id, query.employee_id)
            .await?;
    Ok(ok(assignments))
}
