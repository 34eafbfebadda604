//! Time Entry API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use shared::models::{TimeEntry, TimeEntryInput, TimeEntryUpdate};

use crate::api::context::TenantCtx;
use crate::core::ServerState;
use crate::services;
use crate::utils::{AppResponse, AppResult, ok};

#[derive(serde::Deserialize)]
pub struct DayQuery {
    pub employee_id: i64,
    pub date: NaiveDate,
}

/// GET /api/time-entries?employee_id=..&date=..
pub async fn list(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<AppResponse<Vec<TimeEntry>>>> {
    let entries =
        services::time_entry::list_for_date(&state, ctx.tenant_id, query.employee_id, query.date)
            .await?;
    Ok(ok(entries))
}

/// GET /api/time-entries/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<TimeEntry>>> {
    let entry = services::time_entry::fetch(&state, ctx.tenant_id, id).await?;
    Ok(ok(entry))
}

/// POST /api/time-entries
pub async fn create(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(payload): Json<TimeEntryInput>,
) -> AppResult<Json<AppResponse<TimeEntry>>> {
    let entry = services::time_entry::create(&state, ctx.tenant_id, payload).await?;
    Ok(ok(entry))
}

/// POST /api/time-entries/bulk
pub async fn bulk_create(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Json(payload): Json<Vec<TimeEntryInput>>,
) -> AppResult<Json<AppResponse<Vec<TimeEntry>>>> {
    let entries = services::time_entry::bulk_create(&state, ctx.tenant_id, payload).await?;
    Ok(ok(entries))
}

/// PUT /api/time-entries/:id
pub async fn update(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
    Json(payload): Json<TimeEntryUpdate>,
) -> AppResult<Json<AppResponse<TimeEntry>>> {
    let entry = services::time_entry::update(&state, ctx.tenant_id, id, payload).await?;
    Ok(ok(entry))
}

/// DELETE /api/time-entries/:id
pub async fn delete(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    services::time_entry::delete(&state, ctx.tenant_id, id).await?;
    Ok(ok(()))
}

/// POST /api/time-entries/:id/submit
pub async fn submit(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<TimeEntry>>> {
    let entry = services::time_entry::submit_for_approval(&state, ctx.tenant_id, id).await?;
    Ok(ok(entry))
}

#[derive(serde::Serialize)]
pub struct TotalHours {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub hours: f64,
}

/// GET /api/time-entries/total-hours?employee_id=..&date=..
pub async fn total_hours(
    State(state): State<ServerState>,
    ctx: TenantCtx,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<AppResponse<TotalHours>>> {
    let hours =
        services::time_entry::total_hours(&state, ctx.tenant_id, query.employee_id, query.date)
            .await?;
    Ok(ok(TotalHours {
        employee_id: query.employee_id,
        date: query.date,
        hours,
    }))
}
