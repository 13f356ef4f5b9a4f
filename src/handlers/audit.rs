// src/handlers/audit.rs

use axum::{Json, extract::{Query, State}};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::audit::{AuditListQuery, AuditLog},
    services::policy::{self, Resource, ResourceAction},
};

// GET /api/audit
#[utoipa::path(
    get,
    path = "/api/audit",
    tag = "Auditoria",
    params(AuditListQuery),
    responses(
        (status = 200, description = "Trilha de auditoria, mais recente primeiro", body = Vec<AuditLog>),
        (status = 403, description = "Papel sem acesso à auditoria")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(query): Query<AuditListQuery>,
) -> Result<Json<Vec<AuditLog>>, AppError> {
    policy::require(&session, Resource::Audit, ResourceAction::Read)?;

    let logs = app_state
        .audit_service
        .list(
            policy::company_filter(&session),
            query.page,
            query.limit,
            query.entity_type.as_deref(),
            query.entity_id.as_deref(),
        )
        .await?;
    Ok(Json(logs))
}
