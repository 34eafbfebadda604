//! Project Repository
//!
//! Lookup slice used by time-entry validation and billing; the full
//! project CRUD lives with the CRM modules outside the engine.

use shared::models::{Project, ProjectCreate, Task};
use sqlx::SqlitePool;

use super::RepoResult;

pub async fn find_by_id(pool: &SqlitePool, tenant_id: i64, id: i64) -> RepoResult<Option<Project>> {
    let project = sqlx::query_as::<_, Project>(
        "SELECT id, tenant_id, name, billing_rate, is_active, created_at, updated_at FROM project WHERE tenant_id = ? AND id = ?",
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(project)
}

pub async fn find_task(pool: &SqlitePool, tenant_id: i64, task_id: i64) -> RepoResult<Option<Task>> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, tenant_id, project_id, name, created_at, updated_at FROM task WHERE tenant_id = ? AND id = ?",
    )
    .bind(tenant_id)
    .bind(task_id)
    .fetch_optional(pool)
    .await?;
    Ok(task)
}

pub async fn is_member(pool: &SqlitePool, project_id: i64, employee_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM project_member WHERE project_id = ? AND employee_id = ?",
    )
    .bind(project_id)
    .bind(employee_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn create(pool: &SqlitePool, tenant_id: i64, data: ProjectCreate) -> RepoResult<Project> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO project (id, tenant_id, name, billing_rate, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(&data.name)
    .bind(data.billing_rate)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, tenant_id, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create project".into()))
}

pub async fn create_task(
    pool: &SqlitePool,
    tenant_id: i64,
    project_id: i64,
    name: &str,
) -> RepoResult<Task> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO task (id, tenant_id, project_id, name, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(project_id)
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_task(pool, tenant_id, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create task".into()))
}

pub async fn add_member(pool: &SqlitePool, project_id: i64, employee_id: i64) -> RepoResult<()> {
    sqlx::query("INSERT OR IGNORE INTO project_member (project_id, employee_id) VALUES (?, ?)")
        .bind(project_id)
        .bind(employee_id)
        .execute(pool)
        .await?;
    Ok(())
}
