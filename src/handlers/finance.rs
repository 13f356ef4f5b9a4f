// src/handlers/finance.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::finance::{
        CreateEntryPayload, EntryStatus, FinancialEntry, UpdateEntryStatusPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct EntryListQuery {
    pub status: Option<EntryStatus>,
}

// GET /api/finance
#[utoipa::path(
    get,
    path = "/api/finance",
    tag = "Financeiro",
    params(EntryListQuery),
    responses(
        (status = 200, description = "Lançamentos do tenant", body = Vec<FinancialEntry>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Query(query): Query<EntryListQuery>,
) -> Result<Json<Vec<FinancialEntry>>, AppError> {
    let entries = app_state
        .finance_service
        .list(&session, query.status)
        .await?;
    Ok(Json(entries))
}

// POST /api/finance
#[utoipa::path(
    post,
    path = "/api/finance",
    tag = "Financeiro",
    request_body = CreateEntryPayload,
    responses(
        (status = 201, description = "Lançamento manual criado", body = FinancialEntry)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let entry = app_state.finance_service.create(&session, &payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// PUT /api/finance/{id}/status
#[utoipa::path(
    put,
    path = "/api/finance/{id}/status",
    tag = "Financeiro",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    request_body = UpdateEntryStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = FinancialEntry),
        (status = 404, description = "Lançamento não encontrado")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntryStatusPayload>,
) -> Result<Json<FinancialEntry>, AppError> {
    let entry = app_state
        .finance_service
        .update_status(&session, id, payload.status)
        .await?;
    Ok(Json(entry))
}
