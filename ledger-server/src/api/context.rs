//! Request Context Extractor
//!
//! Tenant and actor identity arrive as headers resolved by the external
//! identity boundary (`x-tenant-id`, `x-actor-id`). Every handler takes a
//! [`TenantCtx`]; there is no ambient tenant state anywhere below it.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::utils::AppError;

#[derive(Debug, Clone, Copy)]
pub struct TenantCtx {
    pub tenant_id: i64,
    /// Acting user, when the caller is authenticated
    pub actor_id: Option<i64>,
}

impl TenantCtx {
    /// The actor, required. Workflow transitions need an accountable
    /// identity.
    pub fn require_actor(&self) -> Result<i64, AppError> {
        self.actor_id
            .ok_or_else(|| AppError::invalid("Missing x-actor-id header"))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for TenantCtx {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = parts
            .headers
            .get("x-tenant-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| AppError::invalid("Missing or invalid x-tenant-id header"))?;

        let actor_id = parts
            .headers
            .get("x-actor-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        Ok(Self {
            tenant_id,
            actor_id,
        })
    }
}
